use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{FilterSpec, ObservatoryRecord, ObservatoryRegistry};
use rfimatch_geo::LatLonBox;
use std::sync::Arc;

/// Selects which observatories to query for a filter spec
#[derive(Debug, Clone)]
pub struct ObservatoryFilter {
    registry: std::result::Result<Arc<ObservatoryRegistry>, String>,
}

impl ObservatoryFilter {
    pub fn new(registry: Arc<ObservatoryRegistry>) -> Self {
        Self { registry: Ok(registry) }
    }

    /// Wrap the outcome of loading a registry
    ///
    /// A load failure is kept and reported by every later [`select`](Self::select).
    pub fn from_load(loaded: Result<ObservatoryRegistry>) -> Self {
        let registry = loaded.map(Arc::new).map_err(|e| match e {
            RfiMatchError::RegistryUnavailable { reason } => reason,
            other => other.to_string(),
        });
        Self { registry }
    }

    pub fn registry(&self) -> Result<&ObservatoryRegistry> {
        self.registry
            .as_deref()
            .map_err(|reason| RfiMatchError::RegistryUnavailable { reason: reason.clone() })
    }

    /// Registry entry for a selected name
    pub fn lookup(&self, name: &str) -> Result<&ObservatoryRecord> {
        self.registry()?
            .get(name)
            .ok_or_else(|| RfiMatchError::UnknownObservatory { name: name.to_string() })
    }

    /// Observatory names to query, in registry or request order
    ///
    /// Explicit names win over the geographic and frequency criteria. Otherwise
    /// a site qualifies when it lies inside the latitude/longitude box and its
    /// whole frequency coverage fits inside the requested range.
    pub fn select(&self, filter: &FilterSpec) -> Result<Vec<String>> {
        let registry = self.registry()?;

        if filter.has_explicit_observatories() {
            let mut selected: Vec<String> = Vec::new();
            for name in filter.observatory_names() {
                if !registry.contains(name) {
                    tracing::warn!(observatory = %name, "Requested observatory is not in the registry");
                    continue;
                }
                if !selected.contains(name) {
                    selected.push(name.clone());
                }
            }
            return Ok(selected);
        }

        let area = LatLonBox::new(filter.lat_range(), filter.lon_range());
        let [freq_min, freq_max] = filter.freq_range_mhz();

        let mut selected: Vec<String> = Vec::new();
        for record in registry.records() {
            let in_area = area.contains(record.latitude, record.longitude);
            let in_band = record.min_freq >= freq_min && record.max_freq <= freq_max;
            if in_area && in_band && !selected.contains(&record.name) {
                selected.push(record.name.clone());
            }
        }

        tracing::debug!(count = selected.len(), "Observatories selected by area and band");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observatory_filter() -> ObservatoryFilter {
        ObservatoryFilter::new(Arc::new(ObservatoryRegistry::builtin().unwrap()))
    }

    #[test]
    fn test_explicit_names_ignore_bounds() {
        let spec = FilterSpec::builder()
            .latitude([60.0, 70.0])
            .unwrap()
            .observatories(["ALMA", "HCRO", "ARECIBO", "ALMA"])
            .build()
            .unwrap();

        let selected = observatory_filter().select(&spec).unwrap();
        assert_eq!(selected, vec!["ALMA", "HCRO"]);
    }

    #[test]
    fn test_default_spec_selects_everything() {
        let selected = observatory_filter().select(&FilterSpec::default()).unwrap();
        assert_eq!(selected, vec!["HCRO", "MEERKAT", "EVLA", "ALMA"]);
    }

    #[test]
    fn test_southern_hemisphere() {
        let spec = FilterSpec::builder().latitude([-90.0, 0.0]).unwrap().build().unwrap();
        assert_eq!(observatory_filter().select(&spec).unwrap(), vec!["MEERKAT", "ALMA"]);
    }

    #[test]
    fn test_frequency_containment_not_overlap() {
        // MEERKAT covers 1000-10000 MHz and fits; HCRO (500-11000) only overlaps
        let spec = FilterSpec::builder().frequencies([900.0, 10000.0]).unwrap().build().unwrap();
        assert_eq!(observatory_filter().select(&spec).unwrap(), vec!["MEERKAT"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let spec = FilterSpec::builder()
            .latitude([80.0, 90.0])
            .unwrap()
            .build()
            .unwrap();
        assert!(observatory_filter().select(&spec).unwrap().is_empty());
    }

    #[test]
    fn test_failed_registry_is_configuration_error() {
        let filter = ObservatoryFilter::from_load(ObservatoryRegistry::from_path("/missing.csv"));
        let err = filter.select(&FilterSpec::default()).unwrap_err();
        assert!(matches!(err, RfiMatchError::RegistryUnavailable { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_lookup() {
        let filter = observatory_filter();
        assert_eq!(filter.lookup("EVLA").unwrap().elevation, 2124.0);
        assert!(matches!(
            filter.lookup("ARECIBO"),
            Err(RfiMatchError::UnknownObservatory { .. })
        ));
    }
}
