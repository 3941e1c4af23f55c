use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grounding::{Point, to_pixel};

/// Bounding box in normalized `[0, 1]` screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl From<[f64; 4]> for BBox {
    fn from([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

impl BBox {
    pub fn centroid(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn center_pixel(&self, screen: (u32, u32)) -> Point {
        let (nx, ny) = self.centroid();
        to_pixel(nx, ny, screen)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub content: String,
    pub bbox: BBox,
}

/// Numbered list of detected on-screen elements, labelled from 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementCatalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl ElementCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: (1u32..).zip(entries).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, label: u32) -> Option<&CatalogEntry> {
        self.entries.get(&label)
    }

    /// `"{label}: {content}"` per line, in label order.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(label, entry)| format!("{label}: {}", entry.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Finds the entry the oracle picked. Only text present in the catalog
    /// counts; anything else is a miss.
    pub fn find(&self, choice: &str) -> Option<&CatalogEntry> {
        let choice = choice.trim();
        if choice.is_empty() {
            return None;
        }
        if let Ok(label) = choice.trim_start_matches('#').parse::<u32>() {
            if let Some(entry) = self.entries.get(&label) {
                return Some(entry);
            }
        }
        self.entries
            .values()
            .find(|entry| entry.content.trim().eq_ignore_ascii_case(choice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ElementCatalog {
        ElementCatalog::from_entries([
            CatalogEntry {
                content: "Save".into(),
                bbox: [0.1, 0.1, 0.2, 0.2].into(),
            },
            CatalogEntry {
                content: "Close window".into(),
                bbox: [0.9, 0.0, 1.0, 0.1].into(),
            },
        ])
    }

    #[test]
    fn labels_start_at_one() {
        let catalog = catalog();
        assert_eq!(catalog.render(), "1: Save\n2: Close window");
        assert_eq!(catalog.get(2).map(|e| e.content.as_str()), Some("Close window"));
    }

    #[test]
    fn matches_only_catalog_text() {
        let catalog = catalog();
        assert_eq!(catalog.find("close WINDOW").map(|e| e.bbox), catalog.get(2).map(|e| e.bbox));
        assert!(catalog.find("2").is_some());
        assert!(catalog.find("the save button").is_none());
        assert!(catalog.find("").is_none());
    }

    #[test]
    fn bbox_centroid_maps_to_pixels() {
        let bbox = BBox::from([0.125, 0.25, 0.375, 0.5]);
        assert_eq!(bbox.center_pixel((1000, 500)), Point { x: 250, y: 187 });
    }

    #[test]
    fn bbox_deserializes_from_array() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"content":"OK","bbox":[0.0,0.5,0.5,1.0]}"#).unwrap();
        assert_eq!(entry.bbox.centroid(), (0.25, 0.75));
    }
}
