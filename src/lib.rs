//! # claim-forge – expense and reimbursement claim PDFs
//!
//! This crate turns the values of a submitted claim form into a printable
//! PDF and appends the supporting receipts to it. The pipeline stages are:
//!
//! 1. **Validate** – per-claim field rules with Dutch messages ([`validation`])
//! 2. **Header** – letterhead with logos or a text-only fallback ([`header`])
//! 3. **Layout** – the claim type's builder draws through a cursor ([`forms`], [`layout`])
//! 4. **Paginate** – break to new pages at the bottom margin ([`pagination`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//! 6. **Merge** – append PDF and image attachments via lopdf ([`merge`])
//!
//! [`pipeline`] runs stages 2 to 6 in one call.

pub mod assets;
pub mod attachment;
pub mod error;
pub mod fonts;
pub mod format;
pub mod forms;
pub mod header;
pub mod iban;
pub mod layout;
pub mod layout_config;
pub mod merge;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod validation;

// Re-exports for convenience
pub use assets::{AssetSource, DirectoryAssets, NoAssets, StaticAssets};
pub use attachment::{AttachmentResource, MediaType};
pub use error::ClaimError;
pub use forms::{FieldValue, FormType, FormValues};
pub use header::HeaderResult;
pub use iban::is_valid_belgian_iban;
pub use merge::merge_attachments;
pub use pagination::Overflow;
pub use pipeline::{assemble, assemble_layout, generate_claim_document, AssemblyConfig};
pub use validation::{validate, ValidationErrors};
