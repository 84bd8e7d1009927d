// Client-side core of the tourism attraction discovery application

// Export modules for each layer of the core
pub mod attraction;
pub mod browser;
pub mod client;
pub mod projection;
pub mod saved;

// Re-export key types for convenience
pub use attraction::{RawAddress, RawAttraction, RawContact, RawImage};
pub use browser::{BrowserPhase, BrowserSnapshot, CategoryBrowser};
pub use client::{
    ApiError, ClientConfig, ClientError, ClientStats, ContentApi, RetryConfig, SearchQuery,
    SearchType, TihClient,
};
pub use projection::{AttractionProjector, AttractionViewModel, ImageRef};
pub use saved::SavedItemsRegistry;
