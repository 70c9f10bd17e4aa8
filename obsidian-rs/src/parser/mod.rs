//! Parsers for note syntax: frontmatter, links, headings.

pub mod code_block;
pub mod frontmatter;
pub mod heading;
pub mod wikilink;
pub mod yaml;

pub use code_block::{find_code_ranges, CodeRange};
pub use frontmatter::{
    frontmatter_lines, line_ending, parse_frontmatter, parse_frontmatter_text,
    replace_leading_lines, text_lines, FrontmatterBlock,
};
pub use heading::{first_title, parse_headings, slugify};
pub use wikilink::{format_link, format_wikilink, parse_all_links, parse_links};
