use std::io;
use std::io::ErrorKind;

use markdown::mdast::Node;
use markdown::{Options, ParseOptions};

/// One heading of a rendered document outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub slug: String,
    pub text: String,
    pub depth: u8,
}

/// Result of rendering an entry body: the heading outline plus the
/// body markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub headings: Vec<Heading>,
    pub html: String,
}

pub fn render_markdown(body: &str) -> io::Result<Rendered> {
    let html = match markdown::to_html_with_options(body, &Options::gfm()) {
        Ok(x) => x,
        Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    };

    let tree = match markdown::to_mdast(body, &ParseOptions::gfm()) {
        Ok(x) => x,
        Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    };

    let mut headings = vec![];
    collect_headings(&tree, &mut headings);

    Ok(Rendered { headings, html })
}

fn collect_headings(node: &Node, headings: &mut Vec<Heading>) {
    if let Node::Heading(heading) = node {
        let mut text = String::new();
        for child in heading.children.iter() {
            push_inline_text(child, &mut text);
        }
        headings.push(Heading {
            slug: slugify(&text),
            text,
            depth: heading.depth,
        });
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_headings(child, headings);
        }
    }
}

fn push_inline_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        Node::InlineCode(code) => out.push_str(&code.value),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    push_inline_text(child, out);
                }
            }
        }
    }
}

/// ASCII slug of a heading text: transliterated, lowercased, with
/// runs of non-alphanumeric characters collapsed to single dashes.
pub fn slugify(text: &str) -> String {
    let ascii = unidecode::unidecode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
