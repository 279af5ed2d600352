use std::io;
use std::sync::Arc;

use anyhow::Result;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{info, warn};

use crate::aggregate;
use crate::authors::resolve_authors;
use crate::catalog::Catalog;
use crate::config::{Config, Defaults, Site};
use crate::entry::EntryId;
use crate::pager::Pager;
use crate::query_string::QueryString;
use crate::store::fs_store::FsStore;
use crate::store::ContentStore;
use crate::view::api::{
    AdjacentItem, AuthorItem, PostItem, PostListPage, PostMeta, SectionItem, TagItem,
};
use crate::view::rss_renderer::RssChannel;

struct AppState {
    config: Config,
    store: FsStore,
}

pub fn feed_xml(site: &Site, catalog: &Catalog) -> Result<Vec<u8>> {
    let channel = RssChannel {
        ch_title: &site.title,
        ch_link: &site.url,
        ch_desc: &site.description,
    };
    let entries = catalog.all_content();
    Ok(channel.render(&entries)?)
}

/// JSON meta block for one post: combined reading stats, attribution,
/// navigation neighbors and the flattened table of contents.
/// `None` when the id doesn't resolve to a non-draft entry.
pub fn build_post_meta<S: ContentStore>(
    store: &S,
    catalog: &Catalog,
    defaults: &Defaults,
    id: &EntryId,
) -> io::Result<Option<PostMeta>> {
    let Some(post) = catalog.post_by_id(id) else {
        return Ok(None);
    };

    let toc = aggregate::toc_sections(store, catalog, id)?;
    let authors = resolve_authors(catalog, post.authors(), &defaults.default_avatar);

    Ok(Some(PostMeta {
        id: post.id.to_string(),
        title: post.title().to_string(),
        href: post.href(),
        word_count: aggregate::combined_word_count(catalog, id),
        reading_time: aggregate::combined_reading_time(
            catalog,
            id,
            defaults.words_per_minute,
        ),
        authors: authors.into_iter().map(AuthorItem::from).collect(),
        adjacent: AdjacentItem::from(catalog.adjacent(id)),
        toc: toc.into_iter().map(SectionItem::from).collect(),
    }))
}

fn json_response<T: serde::Serialize>(value: &T) -> web::HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("application/json; charset=utf-8")
            .body(body),
        Err(e) => {
            warn!("Error serializing response: {}", e);
            web::HttpResponse::InternalServerError().body("Error serializing response")
        }
    }
}

fn store_error(e: io::Error) -> web::HttpResponse {
    warn!("Error reading content store: {}", e);
    web::HttpResponse::InternalServerError().body(format!("Error reading content: {}", e))
}

#[web::get("/rss.xml")]
async fn rss_feed(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let catalog = match Catalog::load(&state.store) {
        Ok(catalog) => catalog,
        Err(e) => return store_error(e),
    };

    match feed_xml(&state.config.site, &catalog) {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/rss+xml; charset=utf-8")
            .body(xml),
        Err(e) => {
            warn!("Error generating feed: {}", e);
            web::HttpResponse::InternalServerError().body("Error generating feed")
        }
    }
}

#[web::get("/api/posts")]
async fn list_posts(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or(""));
    let requested_page = qs.get_page();
    let tag = qs.get_tag();

    let catalog = match Catalog::load(&state.store) {
        Ok(catalog) => catalog,
        Err(e) => return store_error(e),
    };

    let posts = match tag {
        Some(ref tag) => catalog.posts_by_tag(tag),
        None => catalog.blog_posts(),
    };

    let pager = Pager::new(&posts, state.config.defaults.page_size);
    let cur_page = match requested_page {
        // Sanity check for current page
        x if x > pager.page_count() => 1,
        x => x,
    };

    let items: Vec<PostItem> = pager
        .page(cur_page)
        .unwrap_or(&[])
        .iter()
        .map(|post| {
            let reading_time = aggregate::combined_reading_time(
                &catalog,
                &post.id,
                state.config.defaults.words_per_minute,
            );
            PostItem::from_entry(post, reading_time)
        })
        .collect();

    json_response(&PostListPage {
        page: cur_page,
        page_count: pager.page_count(),
        posts: items,
    })
}

#[web::get("/api/tags")]
async fn list_tags(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let catalog = match Catalog::load(&state.store) {
        Ok(catalog) => catalog,
        Err(e) => return store_error(e),
    };

    let tags: Vec<TagItem> = catalog.sorted_tags().into_iter().map(TagItem::from).collect();
    json_response(&tags)
}

fn meta_response(state: &AppState, id: EntryId) -> web::HttpResponse {
    let catalog = match Catalog::load(&state.store) {
        Ok(catalog) => catalog,
        Err(e) => return store_error(e),
    };

    match build_post_meta(&state.store, &catalog, &state.config.defaults, &id) {
        Ok(Some(meta)) => json_response(&meta),
        Ok(None) => web::HttpResponse::NotFound().body(format!("Post {} not found", id)),
        Err(e) => store_error(e),
    }
}

#[web::get("/api/posts/{id}/meta")]
async fn post_meta(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    meta_response(&state, EntryId::new(path.into_inner()))
}

#[web::get("/api/posts/{parent}/{sub}/meta")]
async fn subpost_meta(
    path: web::types::Path<(String, String)>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let (parent, sub) = path.into_inner();
    meta_response(&state, EntryId::new(format!("{}/{}", parent, sub)))
}

#[web::get("/public/{file_name}")]
async fn public_files(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());
    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = FsStore::new(config.paths.content_dir.clone());

    // Load once up front so a broken content directory fails at startup
    // instead of on the first request
    let catalog = Catalog::load(&store)?;
    info!(
        "Serving {} blog posts, {} entries in the combined feed",
        catalog.blog_posts().len(),
        catalog.all_content().len()
    );

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { config, store });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(rss_feed)
            .service(list_posts)
            .service(list_tags)
            .service(post_meta)
            .service(subpost_meta)
            .service(public_files)
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use crate::test_data::fixtures::sample_store;

    use super::*;

    fn site() -> Site {
        Site {
            title: "folio".to_string(),
            url: "https://example.net".to_string(),
            description: "A portfolio and blog".to_string(),
            author: "mark".to_string(),
        }
    }

    fn defaults() -> Defaults {
        Defaults {
            page_size: 10,
            words_per_minute: 200,
            default_avatar: "/public/avatar.png".to_string(),
        }
    }

    #[test]
    fn test_feed_contains_every_listed_entry() {
        let store = sample_store();
        let catalog = Catalog::load(&store).unwrap();

        let xml = feed_xml(&site(), &catalog).unwrap();
        let xml = String::from_utf8(xml).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<item>").count(), catalog.all_content().len());
        assert!(xml.contains("<link>https://example.net/blog/rust-pipelines</link>"));
        assert!(xml.contains("<link>https://example.net/media/tokyo-walk</link>"));
        // Drafts and subposts never syndicate
        assert!(!xml.contains("midnight-draft"));
        assert!(!xml.contains("rust-pipelines/ingest"));
    }

    #[test]
    fn test_build_post_meta() {
        let store = sample_store();
        let catalog = Catalog::load(&store).unwrap();

        let meta = build_post_meta(
            &store,
            &catalog,
            &defaults(),
            &EntryId::new("rust-pipelines"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(meta.id, "rust-pipelines");
        assert_eq!(meta.toc.len(), 3);
        assert_eq!(meta.authors.len(), 1);
        assert!(meta.authors[0].is_registered);
        assert!(meta.adjacent.older.is_some());
        assert!(meta.word_count > 0);
    }

    #[test]
    fn test_build_post_meta_unknown_id() {
        let store = sample_store();
        let catalog = Catalog::load(&store).unwrap();

        let meta = build_post_meta(&store, &catalog, &defaults(), &EntryId::new("missing")).unwrap();
        assert!(meta.is_none());
    }
}
