//! Presentation document model and the converter that fills it

pub mod convert;
pub mod model;

pub use convert::{convert_element, convert_slide, convert_slides, relative_line_height, text_alignment};
pub use model::{
    PptxAutoShape, PptxConnector, PptxFill, PptxFont, PptxObjectFit, PptxParagraph, PptxPicture, PptxPictureSource,
    PptxPosition, PptxPresentationModel, PptxShadow, PptxShape, PptxSlide, PptxStroke, PptxTextBox,
    presentation_schema,
};
