use serde::Deserialize;

/// Affiliate catalog bundled with the binary. Loaded once at startup and
/// shared read-only across requests via `web::Data`.
const CATALOG_JSON: &str = include_str!("../assets/affiliate_catalog.json");

pub const BRAND_NAME: &str = "Eco Friendly Luxury Travels";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub destination: String,
    pub hotel: String,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRegion {
    pub region: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourLink {
    pub region: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub getaways: Vec<CatalogRegion>,
    pub tours: Vec<TourLink>,
}

impl Catalog {
    pub fn load() -> Result<Self, serde_json::Error> {
        serde_json::from_str(CATALOG_JSON)
    }

    /// Region names in catalog order, used to constrain getaway generation
    /// to destinations we can monetize.
    pub fn region_names(&self) -> Vec<&str> {
        self.getaways.iter().map(|r| r.region.as_str()).collect()
    }

    pub fn is_region(&self, name: &str) -> bool {
        self.getaways.iter().any(|r| r.region == name)
    }

    /// All bookable entries in region order. Duplicate destination names
    /// within a region are legal (multi-property listings).
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.getaways.iter().flat_map(|r| r.entries.iter())
    }

}

/// One advertising creative. The rotation order is fixed; the assembler
/// refers to creatives by index.
#[derive(Debug, Clone, Copy)]
pub struct Banner {
    pub alt: &'static str,
    pub link: &'static str,
}

pub const BANNER_ADS: [Banner; 3] = [
    Banner {
        alt: "Villiers Jets - Book Private Jet",
        link: "https://www.villiersjets.com/?id=7275",
    },
    Banner {
        alt: "SeaRadar - Yacht Charter",
        link: "https://searadar.tp.st/wOulUd7g",
    },
    Banner {
        alt: "Skippercity - Yacht Charter",
        link: "https://www.skippercity.com/?ref=sidneym",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::load().expect("bundled catalog must parse");
        assert!(catalog.is_region("Bali"));
        assert!(catalog.is_region("Thailand"));
        assert!(!catalog.is_region("Atlantis"));
        assert!(catalog.entries().count() > 100);
    }

    #[test]
    fn bali_lists_multiple_hotels_for_one_destination() {
        let catalog = Catalog::load().unwrap();
        let bali: Vec<_> = catalog
            .entries()
            .filter(|e| e.destination == "Bali")
            .collect();
        assert!(bali.len() >= 2, "Bali is a multi-property listing");
    }

    #[test]
    fn tour_list_parses_alongside_getaways() {
        let catalog = Catalog::load().unwrap();
        assert!(!catalog.tours.is_empty());
        assert!(catalog.tours.iter().all(|t| t.url.starts_with("http")));
    }
}
