//! Inventory items and the inventory store.
//!
//! Each stage grants exactly one item on success. Items gate the auxiliary
//! tools: the dictionary viewer, the translator, and the magnifier.

use serde::{Deserialize, Serialize};

pub const DICTIONARY_ID: &str = "dictionary";
pub const EMAIL_HELPER_ID: &str = "email_helper";
pub const MAGNIFIER_ID: &str = "magnifier";
pub const WELCOME_KIT_ID: &str = "welcome_kit";

/// A persistent unlock granted on stage success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    /// The stage (1..4) that grants this item.
    pub stage: u8,
}

impl InventoryItem {
    fn new(id: &str, name: &str, icon: &str, description: &str, stage: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            stage,
        }
    }
}

lazy_static::lazy_static! {
    /// The four canonical items, in stage order.
    pub static ref ITEMS: Vec<InventoryItem> = vec![
        InventoryItem::new(
            DICTIONARY_ID,
            "판교어 기초 단어 사전",
            "/assets/icon/dictionary.png",
            "기본적인 판교어를 확인할 수 있는 사전",
            1,
        ),
        InventoryItem::new(
            EMAIL_HELPER_ID,
            "판교어 번역기",
            "/assets/icon/translator.png",
            "업무 메일 작성을 도와주는 도구",
            2,
        ),
        InventoryItem::new(
            MAGNIFIER_ID,
            "판교어 돋보기",
            "/assets/icon/magnifier.png",
            "판교어에 마우스를 올리면 뜻을 알려주는 도구",
            3,
        ),
        InventoryItem::new(
            WELCOME_KIT_ID,
            "판교 생존 웰컴 키트",
            "/assets/icon/certificate.png",
            "판교 생존에 필요한 모든 것이 담긴 키트",
            4,
        ),
    ];
}

/// The item a stage grants on success.
pub fn stage_reward(stage: u8) -> Option<&'static InventoryItem> {
    ITEMS.iter().find(|item| item.stage == stage)
}

/// Find a canonical item by id.
pub fn find_item(id: &str) -> Option<&'static InventoryItem> {
    ITEMS.iter().find(|item| item.id == id)
}

/// The set of unlocked items.
///
/// Adds are idempotent by id; items are never removed except by replacing the
/// whole store on a full reset.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Returns `true` if it was newly added; adding an item
    /// whose id is already present is a silent no-op.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        if self.has(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn has(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut inventory = Inventory::new();
        let item = stage_reward(1).unwrap().clone();

        assert!(inventory.add(item.clone()));
        assert!(!inventory.add(item));
        assert_eq!(inventory.len(), 1);
        assert!(inventory.has(DICTIONARY_ID));
    }

    #[test]
    fn test_stage_rewards_cover_all_stages() {
        for stage in 1..=4 {
            let item = stage_reward(stage).unwrap();
            assert_eq!(item.stage, stage);
        }
        assert!(stage_reward(5).is_none());
    }

    #[test]
    fn test_find_item() {
        assert_eq!(find_item(MAGNIFIER_ID).unwrap().stage, 3);
        assert!(find_item("rubber_duck").is_none());
    }

    #[test]
    fn test_inventory_serializes_as_array() {
        let mut inventory = Inventory::new();
        inventory.add(stage_reward(1).unwrap().clone());

        let json = serde_json::to_value(&inventory).unwrap();
        assert!(json.is_array());

        let restored: Inventory = serde_json::from_value(json).unwrap();
        assert!(restored.has(DICTIONARY_ID));
    }
}
