use scraper::{ElementRef, Html, Selector};

/// Parsed view of one fetched document: plain text, metadata tag contents,
/// anchors, and the element regions the contextual extractor works from. The
/// rest of the crate never touches HTML directly.
pub struct ParsedPage {
    document: Html,
}

#[derive(Debug, Clone)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// A container element (`div`, `section`, ...) with its class/id descriptor
/// and flattened text.
#[derive(Debug, Clone)]
pub struct ContainerRegion {
    pub descriptor: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct VCard {
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

impl ParsedPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Whitespace-normalized text of the document body.
    pub fn text(&self) -> String {
        let body_selector = Selector::parse("body").unwrap();
        self.document
            .select(&body_selector)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    /// Contents of description/keywords `<meta>` tags.
    pub fn meta_contents(&self) -> Vec<String> {
        let meta_selector = Selector::parse("meta").unwrap();
        self.document
            .select(&meta_selector)
            .filter(|tag| {
                tag.value()
                    .attr("name")
                    .map(|name| {
                        let name = name.to_lowercase();
                        name.contains("description") || name.contains("keywords")
                    })
                    .unwrap_or(false)
            })
            .filter_map(|tag| tag.value().attr("content"))
            .map(|content| content.to_string())
            .collect()
    }

    pub fn anchors(&self) -> Vec<Anchor> {
        let link_selector = Selector::parse("a[href]").unwrap();
        self.document
            .select(&link_selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                Some(Anchor {
                    text: element_text(element),
                    href: href.to_string(),
                })
            })
            .collect()
    }

    /// Container elements carrying a class or id, for keyword-weighted
    /// contextual extraction.
    pub fn containers(&self) -> Vec<ContainerRegion> {
        let container_selector =
            Selector::parse("div, section, article, aside, header, footer").unwrap();
        self.document
            .select(&container_selector)
            .filter_map(|element| {
                let class = element.value().attr("class").unwrap_or_default();
                let id = element.value().attr("id").unwrap_or_default();
                if class.is_empty() && id.is_empty() {
                    return None;
                }
                Some(ContainerRegion {
                    descriptor: format!("{} {}", class, id).to_lowercase(),
                    text: element_text(element),
                })
            })
            .collect()
    }

    /// `(heading text, following sibling text)` pairs for h1-h3 headings.
    pub fn header_led_regions(&self) -> Vec<(String, String)> {
        let header_selector = Selector::parse("h1, h2, h3").unwrap();
        self.document
            .select(&header_selector)
            .filter_map(|header| {
                let sibling = header.next_siblings().find_map(ElementRef::wrap)?;
                Some((element_text(header), element_text(sibling)))
            })
            .collect()
    }

    /// hCard-style markup: `.vcard` containers with `.fn/.org/.email/.tel`
    /// classed children.
    pub fn vcards(&self) -> Vec<VCard> {
        let vcard_selector = Selector::parse("div.vcard").unwrap();
        let name_selector = Selector::parse(".fn").unwrap();
        let org_selector = Selector::parse(".org").unwrap();
        let email_selector = Selector::parse(".email").unwrap();
        let tel_selector = Selector::parse(".tel").unwrap();

        self.document
            .select(&vcard_selector)
            .map(|vcard| {
                let field = |selector: &Selector| {
                    vcard
                        .select(selector)
                        .next()
                        .map(element_text)
                        .filter(|text| !text.is_empty())
                };
                VCard {
                    full_name: field(&name_selector),
                    organization: field(&org_selector),
                    email: field(&email_selector),
                    telephone: field(&tel_selector),
                }
            })
            .collect()
    }

    /// Raw contents of `<script type="application/ld+json">` blocks.
    pub fn json_ld_blocks(&self) -> Vec<String> {
        let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
        self.document
            .select(&script_selector)
            .map(|script| script.text().collect::<String>())
            .collect()
    }
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
