use super::params::EmbedView;

/// `<title>` text when neither a title nor a site name is shown.
pub const FALLBACK_DOCUMENT_TITLE: &str = "Embed Preview";

const STYLESHEET: &str = "body {
  font-family: sans-serif;
  background: #111;
  color: #fff;
  padding: 2em;
}
img {
  max-width: 100%;
  height: auto;
  border-radius: 10px;
  margin-top: 1em;
}
";

/// Appends a `<meta>` tag to the HTML buffer.
fn push_meta(buf: &mut String, attr: &str, name: &str, content: &str) {
    buf.push_str(&format!(
        "<meta {}=\"{}\" content=\"{}\">\n",
        attr, name, content,
    ));
}

/// Renders the embed page with Open Graph and Twitter Card meta tags.
///
/// Values in `view` are written as-is; the resolver has already escaped
/// every free-text field.
pub fn render_embed(view: &EmbedView) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");

    if view.title.show {
        push_meta(&mut html, "property", "og:title", &view.title.text);
    }
    if view.site_name.show {
        push_meta(&mut html, "property", "og:site_name", &view.site_name.text);
    }
    push_meta(&mut html, "property", "og:description", &view.description);
    push_meta(&mut html, "property", "og:image", &view.image_url);

    if let Some(size) = &view.image_size {
        push_meta(&mut html, "property", "og:image:width", &size.width);
        push_meta(&mut html, "property", "og:image:height", &size.height);
    }

    push_meta(
        &mut html,
        "name",
        "theme-color",
        &format!("#{}", view.theme_color),
    );
    push_meta(&mut html, "name", "twitter:card", view.card_type.as_ref());
    push_meta(
        &mut html,
        "name",
        "viewport",
        "width=device-width, initial-scale=1.0",
    );

    let document_title = view
        .title
        .visible()
        .or_else(|| view.site_name.visible())
        .unwrap_or(FALLBACK_DOCUMENT_TITLE);
    html.push_str(&format!("<title>{}</title>\n", document_title));

    html.push_str("<style>\n");
    html.push_str(STYLESHEET);
    html.push_str("</style>\n</head>\n<body>\n");

    if let Some(title) = view.title.visible() {
        html.push_str(&format!("<h1>{}</h1>\n", title));
    }
    html.push_str(&format!("<p>{}</p>\n", view.description));
    html.push_str(&format!(
        "<img src=\"{}\" alt=\"Embed Image\">\n",
        view.image_url
    ));

    html.push_str("</body>\n</html>\n");
    html
}
