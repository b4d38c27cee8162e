//! Standalone HTML page wrapping a rendered resume for the browser preview.

use crate::export::raster::CAPTURE_SCALE;

use super::tree::push_escaped;
use super::VisualTree;

/// Id of the element the client snapshots for export.
pub const PREVIEW_ROOT_ID: &str = "resume-preview";

/// A4 at 96 CSS px per inch is 794 px wide.
const PREVIEW_WIDTH_PX: u32 = 794;

pub fn preview_page(tree: &VisualTree, title: &str) -> String {
    let mut escaped_title = String::with_capacity(title.len());
    push_escaped(&mut escaped_title, title);

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{escaped_title}</title>\n\
         <style>body {{ margin: 0; background: #F1F5F9; }} \
         #{PREVIEW_ROOT_ID} {{ width: {PREVIEW_WIDTH_PX}px; margin: 0 auto; }} \
         #{PREVIEW_ROOT_ID} h1, #{PREVIEW_ROOT_ID} h2, #{PREVIEW_ROOT_ID} h3, #{PREVIEW_ROOT_ID} p {{ margin-top: 0; }}</style>\n\
         </head>\n\
         <body>\n\
         <div id=\"{PREVIEW_ROOT_ID}\" data-capture-scale=\"{CAPTURE_SCALE}\">{}</div>\n\
         </body>\n\
         </html>\n",
        tree.to_html()
    )
}
