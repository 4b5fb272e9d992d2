//! Request helpers shared by the catalog components.

use titleport_fetch::{FetchContext, HttpRequest, HttpResponse};
use url::Url;

use crate::error::CatalogError;
use crate::trace::{CallSite, normalize};

/// Sends `request`, turning error statuses and transport failures into
/// normalized catalog errors.
pub(crate) async fn execute(
    ctx: &FetchContext,
    request: HttpRequest,
    site: CallSite,
) -> Result<HttpResponse, CatalogError> {
    ctx.transport
        .send(request)
        .await
        .and_then(HttpResponse::error_for_status)
        .map_err(|e| normalize(e, site))
}

/// Joins `path` onto the resolved service URL.
pub(crate) fn service_url(base: &Url, path: &str) -> Result<Url, CatalogError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| CatalogError::InvalidResponse(format!("{joined}: {e}")))
}

/// Joins `path` onto the service URL, then appends `segments` one by one.
///
/// Each segment is percent-encoded, so ids cannot add path components, a
/// query or a fragment. Empty, `.` and `..` segments are rejected.
pub(crate) fn resource_url(base: &Url, path: &str, segments: &[&str]) -> Result<Url, CatalogError> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(CatalogError::InvalidId((*bad).to_string()));
    }

    let mut url = service_url(base, path)?;
    match url.path_segments_mut() {
        Ok(mut path) => {
            path.pop_if_empty().extend(segments);
        }
        Err(()) => {
            return Err(CatalogError::InvalidResponse(format!("{base}: not a base URL")));
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_url_joins_without_double_slash() {
        let base = Url::parse("https://titles.example.com/").unwrap();
        let url = service_url(&base, "/catalog/v1/users/uitypes").unwrap();
        assert_eq!(url.as_str(), "https://titles.example.com/catalog/v1/users/uitypes");

        let base = Url::parse("https://titles.example.com/region").unwrap();
        let url = service_url(&base, "dev/v1/users/packages").unwrap();
        assert_eq!(url.as_str(), "https://titles.example.com/region/dev/v1/users/packages");
    }

    #[test]
    fn test_resource_url_encodes_each_segment() {
        let base = Url::parse("https://titles.example.com").unwrap();

        let url = resource_url(&base, "/catalog/v1/users/acquisitions", &["../titles/x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://titles.example.com/catalog/v1/users/acquisitions/..%2Ftitles%2Fx"
        );

        let url = resource_url(&base, "/catalog/v1/users/titles", &["t1?x=1#", "launchInfo"]).unwrap();
        assert_eq!(url.path(), "/catalog/v1/users/titles/t1%3Fx=1%23/launchInfo");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_resource_url_rejects_dot_segments() {
        let base = Url::parse("https://titles.example.com").unwrap();
        for id in ["", ".", ".."] {
            let err = resource_url(&base, "/dev/v1/users/packages/status", &[id]).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidId(ref bad) if bad == id));
        }
    }
}
