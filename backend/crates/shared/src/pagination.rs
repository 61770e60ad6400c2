//! Pagination - ページング計算
//!
//! 一覧系エンドポイント共通のクエリ (`?pagination=true&page=2&limit=9`) と
//! レスポンスの `currentPage` / `totalPages` を扱います。

use serde::{Deserialize, Serialize};

/// 一覧のデフォルト件数
pub const DEFAULT_LIMIT: u64 = 9;

/// 1 ページの上限件数
pub const MAX_LIMIT: u64 = 100;

/// 一覧クエリ
///
/// `pagination` が `false`（または未指定）の場合は全件を返します。
/// `page` / `limit` は 1 未満や不正値の場合デフォルトに戻ります。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub pagination: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// ページングが有効な場合のみ [`PageRequest`] を返す
    pub fn resolve(&self, default_limit: u64) -> Option<PageRequest> {
        self.pagination
            .then(|| PageRequest::new(self.page, self.limit, default_limit))
    }

    /// `pagination` フラグに関係なく常にページングする（検索など）
    pub fn always(&self, default_limit: u64) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}

/// 確定済みのページ指定
///
/// `1 <= limit <= MAX_LIMIT`、`offset` は常に `i64` に収まる（SQL の
/// `LIMIT` / `OFFSET` にそのまま渡せる）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);
        let max_page = i64::MAX as u64 / limit + 1;
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(max_page);
        Self { page, limit }
    }

    #[inline]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// スキップする件数 `(page - 1) * limit`
    #[inline]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// `ceil(total / limit)`
#[inline]
pub fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit.max(1))
}

/// 一覧レスポンス
///
/// ページング無効時は `currentPage` / `totalPages` を省略します。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: u64, page: Option<PageRequest>) -> Self {
        Self {
            items,
            total,
            current_page: page.map(|p| p.page()),
            total_pages: page.map(|p| total_pages(total, p.limit())),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamp() {
        let req = PageRequest::new(None, None, DEFAULT_LIMIT);
        assert_eq!((req.page(), req.limit(), req.offset()), (1, 9, 0));

        let req = PageRequest::new(Some(0), Some(0), DEFAULT_LIMIT);
        assert_eq!((req.page(), req.limit()), (1, 9));

        let req = PageRequest::new(Some(3), Some(4), DEFAULT_LIMIT);
        assert_eq!(req.offset(), 8);
    }

    #[test]
    fn test_huge_values_are_clamped() {
        let req = PageRequest::new(Some(2), Some(u64::MAX), DEFAULT_LIMIT);
        assert_eq!(req.limit(), MAX_LIMIT);
        assert_eq!(req.offset(), MAX_LIMIT);

        let req = PageRequest::new(Some(u64::MAX), Some(u64::MAX), DEFAULT_LIMIT);
        assert!(i64::try_from(req.offset()).is_ok());
        assert!(i64::try_from(req.limit()).is_ok());

        let req = PageRequest::new(Some(u64::MAX), Some(1), DEFAULT_LIMIT);
        assert_eq!(req.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_is_ceil() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_resolve_respects_flag() {
        let q = PageQuery::default();
        assert!(q.resolve(DEFAULT_LIMIT).is_none());
        assert_eq!(q.always(10).limit(), 10);

        let q = PageQuery {
            pagination: true,
            page: Some(2),
            limit: None,
        };
        assert_eq!(q.resolve(DEFAULT_LIMIT).map(|p| p.page()), Some(2));
    }

    #[test]
    fn test_paged_omits_page_fields_when_disabled() {
        let json = serde_json::to_value(Paged::new(vec![1, 2], 2, None)).unwrap();
        assert!(json.get("currentPage").is_none());

        let page = PageRequest::new(Some(1), Some(1), DEFAULT_LIMIT);
        let json = serde_json::to_value(Paged::new(vec![1], 2, Some(page))).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 2);
    }
}
