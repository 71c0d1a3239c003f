//! Read-only catalog of subscription services.
//!
//! The catalog is loaded once at startup from a JSON document and never
//! mutated afterwards. A missing or malformed catalog is a startup error; the
//! views downstream trust the records to match the schema.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::Deserialize;
use tracing::{debug, info};

const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.json");

/// How to reach the seller over WhatsApp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactInfo {
    /// Phone number, optionally prefixed with `+`.
    pub whatsapp: String,
    /// Message prefilled by the generic contact action.
    pub message: String,
}

/// One purchasable tier of a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanRecord {
    pub duration: String,
    pub price: String,
    pub currency: String,
    pub features: Vec<String>,
    /// Cosmetic marker. Does not affect ordering or selectability.
    #[serde(default)]
    pub popular: bool,
}

/// One subscribable product offering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    /// Accent color token, e.g. `from-red-500 to-red-700`.
    pub color: String,
    pub bg_color: String,
    pub border_color: String,
    pub plans: Vec<PlanRecord>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    contact: ContactInfo,
    services: Vec<ServiceRecord>,
}

/// The static catalog: contact info plus services in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    contact: ContactInfo,
    services: Vec<Arc<ServiceRecord>>,
}

impl Catalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    /// Returns an error if the document does not match the catalog schema or
    /// if two services share an id.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(text).wrap_err("Catalog does not match the expected schema")?;

        let mut seen = HashSet::new();
        for service in &document.services {
            if !seen.insert(service.id.as_str()) {
                return Err(eyre!("Duplicate service id in catalog: {}", service.id));
            }
        }

        Ok(Self {
            contact: document.contact,
            services: document.services.into_iter().map(Arc::new).collect(),
        })
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read catalog from {}", path.display()))?;
        let catalog = Self::from_json(&text)
            .wrap_err_with(|| format!("Invalid catalog at {}", path.display()))?;
        debug!("Loaded catalog from {:?}", path);
        Ok(catalog)
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    /// Only fails if the bundled asset itself is malformed.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG).wrap_err("Bundled catalog is invalid")
    }

    pub const fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn services(&self) -> &[Arc<ServiceRecord>] {
        &self.services
    }

    /// Look up a service by id.
    pub fn service(&self, id: &str) -> Option<Arc<ServiceRecord>> {
        self.services.iter().find(|s| s.id == id).cloned()
    }
}

/// Load the catalog from the first configured source.
///
/// A path given on the command line wins over the config file, which wins
/// over the bundled catalog.
///
/// # Errors
/// Returns an error if the chosen catalog cannot be loaded.
pub fn resolve(cli_path: Option<&Path>, config_path: Option<&Path>) -> Result<Catalog> {
    let catalog = match cli_path.or(config_path) {
        Some(path) => Catalog::load(path)?,
        None => Catalog::bundled()?,
    };
    info!(services = catalog.services().len(), "Catalog ready");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r#"{
        "contact": { "whatsapp": "+15551234567", "message": "hello" },
        "services": [
            {
                "id": "netflix",
                "name": "Netflix",
                "description": "Movies",
                "logo": "N",
                "color": "from-red-500 to-red-700",
                "bgColor": "bg-red-50",
                "borderColor": "border-red-200",
                "plans": [
                    { "duration": "1 Month", "price": "9.99", "currency": "USD", "features": ["HD"] },
                    { "duration": "1 Year", "price": "99.99", "currency": "USD", "features": [], "popular": true }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.services().is_empty());
        assert!(catalog.contact().whatsapp.starts_with('+'));
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        assert_eq!(catalog.contact().message, "hello");

        let service = catalog.service("netflix").unwrap();
        assert_eq!(service.bg_color, "bg-red-50");
        assert_eq!(service.plans.len(), 2);
        assert!(!service.plans[0].popular);
        assert!(service.plans[1].popular);
    }

    #[test]
    fn test_unknown_service() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        assert!(catalog.service("hulu").is_none());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let text = r#"{ "contact": { "whatsapp": "+1" }, "services": [] }"#;
        assert!(Catalog::from_json(text).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let service = r#"{ "id": "a", "name": "A", "description": "", "logo": "",
            "color": "", "bgColor": "", "borderColor": "", "plans": [] }"#;
        let text = format!(
            r#"{{ "contact": {{ "whatsapp": "+1", "message": "m" }}, "services": [{service}, {service}] }}"#
        );
        let error = Catalog::from_json(&text).unwrap_err();
        assert!(error.to_string().contains("Duplicate service id"));
    }

    #[test]
    fn test_resolve_prefers_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let missing = Path::new("/definitely/not/here.json");
        let catalog = resolve(Some(file.path()), Some(missing)).unwrap();
        assert_eq!(catalog.services().len(), 1);
    }

    #[test]
    fn test_resolve_missing_file_fails() {
        let missing = Path::new("/definitely/not/here.json");
        assert!(resolve(None, Some(missing)).is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_bundled() {
        let catalog = resolve(None, None).unwrap();
        assert!(catalog.service("netflix").is_some());
    }
}
