//! Sitemap XML generation.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::SiteError;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Write a `urlset` sitemap listing `urls`.
pub fn sitemap_xml<'a, I>(urls: I) -> Result<String, SiteError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)])),
    )?;
    for url in urls {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        write(&mut writer, Event::Start(BytesStart::new("loc")))?;
        write(&mut writer, Event::Text(BytesText::new(url)))?;
        write(&mut writer, Event::End(BytesEnd::new("loc")))?;
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }
    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| SiteError::Sitemap(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SiteError> {
    writer
        .write_event(event)
        .map_err(|e| SiteError::Sitemap(e.to_string()))
}
