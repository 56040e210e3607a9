use crate::constants::CHECKLIST_ITEMS;
use crate::models::Checklist;

/// Completion percentage of a checklist: one of 0, 25, 50, 75 or 100.
pub fn calc_progress(checklist: &Checklist) -> u8 {
    let done = checklist.done_count() as f64;
    (100.0 * done / CHECKLIST_ITEMS as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChecklistItem;

    #[test]
    fn test_single_item_is_25() {
        let checklist = Checklist {
            research: true,
            ..Default::default()
        };
        assert_eq!(calc_progress(&checklist), 25);
    }

    #[test]
    fn test_every_combination_is_a_quarter_step() {
        let items = [
            ChecklistItem::Research,
            ChecklistItem::Questions,
            ChecklistItem::Equipment,
            ChecklistItem::Thumbnails,
        ];
        for mask in 0u8..16 {
            let mut checklist = Checklist::default();
            for (bit, item) in items.iter().enumerate() {
                checklist.set(*item, mask & (1 << bit) != 0);
            }
            let pct = calc_progress(&checklist);
            assert_eq!(pct as u32, 25 * mask.count_ones());
            assert!([0, 25, 50, 75, 100].contains(&pct));
        }
    }
}
