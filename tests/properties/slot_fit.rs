//! Property tests for best-fit slot selection.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use rackfit::infrastructure::{InMemoryBuildStore, InMemorySpecRepository};
use rackfit::{ComponentType, Engine, EngineConfig, ExistingComponent, ExistingComponentSet, SlotSize};

fn slot_size() -> impl Strategy<Value = SlotSize> {
    proptest::sample::select(SlotSize::CHAIN.to_vec())
}

/// Slot groups of a board: per-size counts, possibly zero
fn board_layout() -> impl Strategy<Value = Vec<(SlotSize, u32)>> {
    proptest::collection::vec((slot_size(), 0u32..3), 0..5)
}

fn engine_for(layout: &[(SlotSize, u32)]) -> Engine {
    let groups: Vec<_> = layout
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(size, count)| json!({"size": size.as_str(), "count": count}))
        .collect();
    let repo = InMemorySpecRepository::new().with(
        ComponentType::Motherboard,
        "mb-prop",
        json!({"socket": "LGA4189", "pcie_slots": groups}),
    );

    let mut build = ExistingComponentSet::new("prop");
    build.push(ExistingComponent::new(ComponentType::Motherboard, "mb-prop"));
    let store = InMemoryBuildStore::new();
    store.put(build);

    Engine::new(Arc::new(repo), Arc::new(store), &EngineConfig::default())
}

/// `pcie_x8_slot_2` -> x8
fn size_of(slot_id: &str) -> Option<SlotSize> {
    let rest = slot_id.strip_prefix("pcie_")?;
    let (size, _) = rest.split_once("_slot_")?;
    size.parse().ok()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a suggested slot is never narrower than the card, and no
    /// narrower free slot would have fit.
    #[test]
    fn property_best_fit_is_smallest_sufficient(
        layout in board_layout(),
        card in slot_size(),
    ) {
        let engine = engine_for(&layout);
        let free: Vec<SlotSize> = layout
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(size, _)| *size)
            .collect();
        let smallest = free.iter().copied().filter(|s| card.fits_in(*s)).min();

        let chosen = engine.assign_slot("prop", card).unwrap();
        match (chosen, smallest) {
            (Some(id), Some(expected)) => {
                let size = size_of(&id);
                prop_assert_eq!(size, Some(expected), "slot {}", id);
            }
            (None, None) => {}
            (chosen, expected) => {
                prop_assert!(false, "chose {:?}, expected size {:?}", chosen, expected);
            }
        }
    }

    /// PROPERTY: availability totals equal the sum of the board's groups.
    #[test]
    fn property_availability_counts_every_slot(layout in board_layout()) {
        let engine = engine_for(&layout);
        let availability = engine.slot_availability("prop").unwrap();
        let expected: u32 = layout.iter().map(|(_, count)| *count).sum();
        prop_assert_eq!(availability.total_slots(), expected);
        prop_assert_eq!(availability.used_slots(), 0);
    }
}
