//! User-facing reply texts

pub const ASK_PRODUCT_NAME: &str = "Please type the product name.";
pub const NO_MATCHING_PRODUCTS: &str = "No matching products found.";
pub const MATCHING_PRODUCTS: &str = "Matching products:";
pub const NO_IMAGES_FOUND: &str = "No images found in assets folder.";
pub const INVALID_SELECTION: &str = "Invalid selection. Try again.";
pub const IMAGE_SELECTED: &str = "Image selected. Enter headline.";
pub const ASK_HEADLINE: &str = "Please enter a headline.";
pub const GOT_HEADLINE: &str = "Got headline.\nNow enter description.";
pub const ASK_DESCRIPTION: &str = "Please enter a description.";
pub const ANALYSIS_FAILED: &str = "Failed to analyze image. Send the description again to retry.";
pub const BANNER_FAILED: &str = "Failed to generate banner. Send the description again to retry.";
pub const BANNER_GENERATED: &str = "Banner generated successfully.";
pub const NOT_LEGIBLE: &str =
    "I tried to create a banner, but the text was not legible. Let's try different text: enter a new description.";
pub const SESSION_CANCELLED: &str = "Banner cancelled. Type a product name to start again.";
