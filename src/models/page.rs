use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::address::AddressResult;
use super::delivery::Delivery;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Normalized paging window (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Clamp raw query values into a valid window
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Cut one page out of an already ordered result set
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let total_pages = total.div_ceil(self.page_size);
        let data = items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size)
            .collect();

        Page {
            data,
            total,
            page: self.page,
            page_size: self.page_size,
            total_pages,
            has_more: self.page < total_pages,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paging query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,
    /// Results per page (default 10, max 100)
    pub page_size: Option<usize>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        Self::new(params.page, params.page_size)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(AddressPage = Page<AddressResult>, DeliveryPage = Page<Delivery>)]
pub struct Page<T> {
    /// Array of results for the current page
    pub data: Vec<T>,
    /// Total number of results across all pages
    pub total: usize,
    /// Current page number
    pub page: usize,
    /// Number of results per page
    pub page_size: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Whether there are more pages available
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, page_size: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, page_size: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(5000)).page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_paginate_middle_page() {
        let page = PageRequest::new(Some(2), Some(3)).paginate((1..=8).collect::<Vec<_>>());
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.total, 8);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more);
    }

    #[test]
    fn test_paginate_past_the_end() {
        let page = PageRequest::new(Some(9), Some(3)).paginate(vec![1, 2]);
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn test_huge_page_number_is_just_empty() {
        let request = PageRequest::from(PageParams {
            page: Some(usize::MAX),
            page_size: Some(10),
        });
        assert_eq!(request.offset(), usize::MAX);

        let page = request.paginate(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn test_map_keeps_paging() {
        let page = PageRequest::default().paginate(vec![1, 2, 3]).map(|n| n * 2);
        assert_eq!(page.data, vec![2, 4, 6]);
        assert_eq!(page.total, 3);
    }
}
