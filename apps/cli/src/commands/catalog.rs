//! # Catalog Command

use ohana_core::catalog::{services, DryCleaningService};
use serde::Serialize;

/// A service with its price already written out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub service: DryCleaningService,
    pub quote: String,
}

/// The price list, optionally filtered by a case-insensitive name fragment.
pub fn list(search: Option<&str>) -> Vec<CatalogEntry> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

    services()
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .map(|s| CatalogEntry {
            service: *s,
            quote: s.quote(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_list_and_filter() {
        assert_eq!(list(None).len(), services().len());

        let sacos = list(Some(" SACO "));
        assert!(sacos.len() >= 2);
        assert!(sacos.iter().all(|e| e.service.name.to_lowercase().contains("saco")));

        assert!(list(Some("sombrero")).is_empty());
    }

    #[test]
    fn test_entry_json() {
        let traje = list(Some("traje")).into_iter().next().unwrap();
        let json = serde_json::to_value(&traje).unwrap();
        assert_eq!(json["name"], "Traje");
        assert_eq!(json["priceType"], "range");
        assert_eq!(json["quote"], "$29.000 - $34.000");
    }
}
