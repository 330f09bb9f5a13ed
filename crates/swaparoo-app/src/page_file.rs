use swaparoo_page::Document;

/// Build a page from plain text, one `<p>` per blank-line separated block
pub fn document_from_text(hostname: &str, lang: Option<&str>, text: &str) -> Document {
    let mut doc = Document::new(hostname);
    if let Some(lang) = lang {
        doc.set_lang(lang);
    }

    let body = doc.body();
    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        let p = doc.append_element(body, "p");
        doc.append_text(p, block);
    }
    doc
}

/// Text of every paragraph with swapped words shown as `[target]`
pub fn render_swapped(doc: &Document) -> String {
    let mut out = Vec::new();
    for &block in doc.children(doc.body()) {
        if doc.tag(block) != Some("p") {
            continue;
        }

        let mut line = String::new();
        for &node in doc.children(block) {
            match doc.text(node) {
                Some(text) => line.push_str(text),
                None => line.push_str(&format!("[{}]", doc.text_content(node))),
            }
        }
        out.push(line);
    }
    out.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use swaparoo_page::ActivePool;
    use swaparoo_page::scanner::scan;

    #[test]
    fn renders_markers_in_brackets() {
        let mut doc = document_from_text("example.com", Some("en"), "The water is cold today.\n\nA house.\n");
        let pool: ActivePool = [("water", "agua"), ("house", "casa")]
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        scan(&mut doc, &pool);

        assert_eq!(doc.lang(), Some("en"));
        assert_eq!(
            render_swapped(&doc),
            "The [agua] is cold today.\n\nA [casa]."
        );
    }
}
