//! Pagination planning
//!
//! The plan is computed before anything is drawn: which output page holds
//! the title, each text page, each image, and which text pages get a color
//! wash from their paired image. Page numbers are 1-based.
//!
//! Every manuscript page takes two output pages, text then partner. The
//! partner is the matching full-bleed image, or a blank page once images run
//! out, so text and image pages keep the same parity through the book.

use std::collections::BTreeMap;

/// What goes on one output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// Title and author
    Title,
    /// Blank page after the title (only with `title_verso`)
    TitleVerso,
    /// Text of manuscript page `manuscript_index`
    Text { manuscript_index: usize },
    /// Full-bleed image `image_index`
    Image { image_index: usize },
    /// Partner page for a text page with no image left
    Blank,
}

/// Page counts derived from a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_pages: usize,
    pub title_pages: usize,
    pub text_pages: usize,
    pub image_pages: usize,
    pub blank_pages: usize,
    pub themed_pages: usize,
}

/// Full page layout of the body document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    slots: Vec<PageSlot>,
    themes: BTreeMap<usize, usize>,
}

impl PagePlan {
    /// Plan the body for `page_count` manuscript pages and `image_count`
    /// images.
    pub fn new(has_title: bool, title_verso: bool, page_count: usize, image_count: usize) -> Self {
        let mut slots = Vec::with_capacity(2 * page_count + 2);
        let mut themes = BTreeMap::new();
        let mut current_page = 1;

        if has_title {
            slots.push(PageSlot::Title);
            current_page += 1;
            if title_verso {
                slots.push(PageSlot::TitleVerso);
                current_page += 1;
            }
        }

        for i in 0..page_count {
            let text_page = current_page;
            slots.push(PageSlot::Text {
                manuscript_index: i,
            });

            if i < image_count {
                themes.insert(text_page, i);
                slots.push(PageSlot::Image { image_index: i });
            } else {
                slots.push(PageSlot::Blank);
            }

            current_page += 2;
        }

        debug_assert_eq!(current_page - 1, slots.len());

        Self { slots, themes }
    }

    /// Slots in output order; index 0 is page 1.
    pub fn slots(&self) -> &[PageSlot] {
        &self.slots
    }

    /// Slot on a 1-based page number.
    pub fn slot(&self, page: usize) -> Option<PageSlot> {
        page.checked_sub(1).and_then(|idx| self.slots.get(idx).copied())
    }

    /// Image whose mean color washes the given text page.
    pub fn theme_for(&self, page: usize) -> Option<usize> {
        self.themes.get(&page).copied()
    }

    /// Page number → image index for every washed page.
    pub fn themes(&self) -> &BTreeMap<usize, usize> {
        &self.themes
    }

    pub fn total_pages(&self) -> usize {
        self.slots.len()
    }

    /// Iterate `(page_number, slot)` pairs.
    pub fn pages(&self) -> impl Iterator<Item = (usize, PageSlot)> + '_ {
        self.slots.iter().enumerate().map(|(idx, slot)| (idx + 1, *slot))
    }

    pub fn summary(&self) -> PlanSummary {
        let count = |pred: fn(&PageSlot) -> bool| self.slots.iter().filter(|s| pred(s)).count();
        PlanSummary {
            total_pages: self.slots.len(),
            title_pages: count(|s| matches!(s, PageSlot::Title | PageSlot::TitleVerso)),
            text_pages: count(|s| matches!(s, PageSlot::Text { .. })),
            image_pages: count(|s| matches!(s, PageSlot::Image { .. })),
            blank_pages: count(|s| matches!(s, PageSlot::Blank)),
            themed_pages: self.themes.len(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_then_text_image_pairs() {
        let plan = PagePlan::new(true, false, 2, 2);
        assert_eq!(
            plan.slots(),
            &[
                PageSlot::Title,
                PageSlot::Text { manuscript_index: 0 },
                PageSlot::Image { image_index: 0 },
                PageSlot::Text { manuscript_index: 1 },
                PageSlot::Image { image_index: 1 },
            ]
        );
        assert_eq!(plan.theme_for(2), Some(0));
        assert_eq!(plan.theme_for(4), Some(1));
        assert_eq!(plan.theme_for(3), None);
    }

    #[test]
    fn test_slot_lookup_is_one_based() {
        let plan = PagePlan::new(false, false, 1, 0);
        assert_eq!(plan.slot(0), None);
        assert_eq!(plan.slot(1), Some(PageSlot::Text { manuscript_index: 0 }));
        assert_eq!(plan.slot(2), Some(PageSlot::Blank));
        assert_eq!(plan.slot(3), None);
    }
}
