//! Store/item lookup table used to populate selections

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One item sold by a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    #[serde(rename = "store_nbr")]
    pub store: u32,
    #[serde(rename = "item_nbr")]
    pub item: u32,
    pub family: String,
    pub avg_sales: f64,
}

/// Mapping of stores to the items they carry
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: Vec<StoreItem>,
}

impl LookupTable {
    pub fn new(entries: Vec<StoreItem>) -> Self {
        Self { entries }
    }

    /// Load the lookup table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        let entries = reader
            .deserialize()
            .collect::<std::result::Result<Vec<StoreItem>, csv::Error>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[StoreItem] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct store numbers, ascending
    pub fn stores(&self) -> Vec<u32> {
        self.entries
            .iter()
            .map(|e| e.store)
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }

    /// Items carried by `store`; empty for an unknown store
    pub fn items_for_store(&self, store: u32) -> Vec<StoreItem> {
        self.entries
            .iter()
            .filter(|e| e.store == store)
            .cloned()
            .collect()
    }

    pub fn contains(&self, store: u32, item: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.store == store && e.item == item)
    }

    pub fn get(&self, store: u32, item: u32) -> Option<&StoreItem> {
        self.entries
            .iter()
            .find(|e| e.store == store && e.item == item)
    }
}
