//! Validated pagination window for task listings.

use super::TaskDomainError;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPage`] when `page` is zero or
    /// [`TaskDomainError::InvalidPageSize`] when `page_size` is outside
    /// `1..=100`.
    pub const fn new(page: u32, page_size: u32) -> Result<Self, TaskDomainError> {
        if page == 0 {
            return Err(TaskDomainError::InvalidPage(page));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(TaskDomainError::InvalidPageSize(page_size));
        }
        Ok(Self { page, page_size })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the number of tasks per page.
    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    /// Returns how many tasks precede this page in fetch order.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
