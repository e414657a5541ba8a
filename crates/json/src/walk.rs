//! Key-path resolution.

use jsonparse_engine::NodeId;

use crate::document::Document;
use crate::error::QueryError;

/// Follow `segments` from `start`, one object member per segment.
///
/// `path` is only used in error values. Each segment must name a member of
/// the object reached so far; keys compare by exact decoded text, so an
/// empty segment selects the member whose key is `""`.
pub(crate) fn walk<'s, I>(
    doc: &Document<'_>,
    start: NodeId,
    path: &str,
    segments: I,
) -> Result<NodeId, QueryError>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut node = start;
    for segment in segments {
        if !doc.is_object(node) {
            return Err(QueryError::NotAnObject {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
        node = doc
            .index()
            .lookup(doc.input(), node, segment)
            .ok_or_else(|| QueryError::KeyNotFound {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
    }
    Ok(node)
}
