// src/common/pagination.rs

use axum::http::Uri;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Presente: a resposta vem no envelope paginado. Ausente: array puro.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Page(Paginated<T>),
}

/// Recorta a lista já ordenada. `uri` é usado para montar os links
/// `next`/`previous` preservando os outros filtros da query string.
pub fn paginate<T>(items: Vec<T>, query: &PageQuery, uri: &Uri) -> ListResponse<T> {
    let Some(page) = query.page else {
        return ListResponse::Bare(items);
    };
    let page = page.max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let count = items.len();
    let start = (page - 1).saturating_mul(page_size);
    let results: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    let has_next = start.saturating_add(page_size) < count;
    let next = has_next.then(|| page_link(uri, page + 1, page_size));
    let previous = (page > 1).then(|| page_link(uri, page - 1, page_size));

    ListResponse::Page(Paginated {
        count,
        next,
        previous,
        results,
    })
}

fn page_link(uri: &Uri, page: usize, page_size: usize) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| !pair.starts_with("page=") && !pair.starts_with("page_size="))
        .map(str::to_string)
        .collect();
    params.push(format!("page={page}"));
    params.push(format!("page_size={page_size}"));

    format!("{}?{}", uri.path(), params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(raw: &str) -> Uri {
        raw.parse().unwrap()
    }

    #[test]
    fn without_page_the_list_is_returned_as_is() {
        let response = paginate(vec![1, 2, 3], &PageQuery::default(), &uri("/api/staff"));
        assert!(matches!(response, ListResponse::Bare(ref items) if items == &vec![1, 2, 3]));
    }

    #[test]
    fn middle_page_links_both_ways_and_keeps_filters() {
        let query = PageQuery {
            page: Some(2),
            page_size: Some(2),
        };
        let response = paginate(
            (1..=5).collect(),
            &query,
            &uri("/api/appointments?business=abc&page=2&page_size=2"),
        );

        let ListResponse::Page(page) = response else {
            panic!("expected a page envelope");
        };
        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec![3, 4]);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/appointments?business=abc&page=3&page_size=2")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/appointments?business=abc&page=1&page_size=2")
        );
    }

    #[test]
    fn page_size_is_capped() {
        let query = PageQuery {
            page: Some(1),
            page_size: Some(10_000),
        };
        let response = paginate((0..300).collect::<Vec<_>>(), &query, &uri("/api/customers"));
        let ListResponse::Page(page) = response else {
            panic!("expected a page envelope");
        };
        assert_eq!(page.count, 300);
        assert_eq!(page.results.len(), MAX_PAGE_SIZE);
    }
}
