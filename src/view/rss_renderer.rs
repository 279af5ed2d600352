use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::entry::Entry;

/* Example
<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">

<channel>
  <title>folio</title>
  <link>https://example.net</link>
  <description>A portfolio and blog</description>
  <item>
    <title>Rust pipelines</title>
    <link>https://example.net/blog/rust-pipelines</link>
    <guid isPermaLink="false">rust-pipelines</guid>
    <description>Building a data pipeline in Rust</description>
    <pubDate>Sun, 10 Mar 2024 09:30:00 +0000</pubDate>
  </item>
</channel>

</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl RssChannel<'_> {
    pub fn render(&self, entries: &[&Entry]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for entry in entries {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", entry.title())?;
            push_text(&mut writer, "link", &full_link(self.ch_link, &entry.href()))?;

            // <guid isPermaLink="false">rust-pipelines</guid>
            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(entry.id.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_text(&mut writer, "description", entry.description())?;

            // Undated entries (a project without a start date) carry no pubDate
            if let Some(date) = entry.effective_date() {
                let date = Utc.from_utc_datetime(&date);
                push_text(&mut writer, "pubDate", &date.to_rfc2822())?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn full_link(base_url: &str, href: &str) -> String {
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{}{}", base_url, href)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
