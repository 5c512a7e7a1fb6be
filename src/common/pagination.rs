// src/common/pagination.rs

use serde::Serialize;

/// Janela fixa de botões: até 7 páginas aparecem todas.
const MAX_VISIBLE: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis(EllipsisMarker),
}

/// Serializa como `"..."` no JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipsisMarker;

impl Serialize for EllipsisMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("...")
    }
}

impl PageItem {
    pub const ELLIPSIS: PageItem = PageItem::Ellipsis(EllipsisMarker);
}

/// Sequência de páginas para o controle de paginação.
///
/// * `total <= 7`: todas as páginas;
/// * início (`current <= 4`): `1 2 3 4 5 … N`;
/// * fim (`current >= N - 3`): `1 … N-4 N-3 N-2 N-1 N`;
/// * meio: `1 … c-1 c c+1 … N`.
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= MAX_VISIBLE {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let mut items = Vec::with_capacity(MAX_VISIBLE as usize);

    if current <= 4 {
        items.extend((1..=5).map(PageItem::Page));
        items.push(PageItem::ELLIPSIS);
        items.push(PageItem::Page(total_pages));
    } else if current >= total_pages - 3 {
        items.push(PageItem::Page(1));
        items.push(PageItem::ELLIPSIS);
        items.extend((total_pages - 4..=total_pages).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::ELLIPSIS);
        items.extend((current - 1..=current + 1).map(PageItem::Page));
        items.push(PageItem::ELLIPSIS);
        items.push(PageItem::Page(total_pages));
    }

    items
}

pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::Page;

    const E: PageItem = PageItem::ELLIPSIS;

    #[test]
    fn small_totals_show_every_page() {
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert_eq!(
            page_window(3, 7),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn near_the_start() {
        let expected = vec![Page(1), Page(2), Page(3), Page(4), Page(5), E, Page(10)];
        for current in 1..=4 {
            assert_eq!(page_window(current, 10), expected, "current = {current}");
        }
    }

    #[test]
    fn near_the_end() {
        let expected = vec![Page(1), E, Page(6), Page(7), Page(8), Page(9), Page(10)];
        for current in 7..=10 {
            assert_eq!(page_window(current, 10), expected, "current = {current}");
        }
    }

    #[test]
    fn in_the_middle() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), E, Page(4), Page(5), Page(6), E, Page(10)]
        );
        assert_eq!(
            page_window(6, 10),
            vec![Page(1), E, Page(5), Page(6), Page(7), E, Page(10)]
        );
    }

    #[test]
    fn eight_pages_has_no_middle_window() {
        assert_eq!(
            page_window(4, 8),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), E, Page(8)]
        );
        assert_eq!(
            page_window(5, 8),
            vec![Page(1), E, Page(4), Page(5), Page(6), Page(7), Page(8)]
        );
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(page_window(0, 10), page_window(1, 10));
        assert_eq!(page_window(99, 10), page_window(10, 10));
    }

    #[test]
    fn ellipsis_serializes_as_dots() {
        let json = serde_json::to_string(&page_window(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
