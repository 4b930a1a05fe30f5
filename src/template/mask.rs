use crate::config::TemplateConfig;
use crate::message::Message;
use crate::template::time::PassTime;
use crate::template::token;
use crate::utils::Result;

/// Expands a path mask into an absolute, `/`-joined path.
///
/// Each `/` segment is split on `@`, every non-empty piece is resolved as a
/// token and the pieces are concatenated with no separator, so
/// `@id@-@date` yields `sub1-20240305`. Empty segments are skipped. The
/// result always starts with `/` and never ends with one (root excepted).
pub fn expand_mask(
    mask: &str,
    msg: &Message<'_>,
    cfg: &TemplateConfig,
    time: &mut PassTime<'_>,
) -> Result<String> {
    let mut path = String::with_capacity(mask.len() + 16);

    for segment in mask.split('/').filter(|s| !s.is_empty()) {
        path.push('/');
        for piece in segment.split('@').filter(|p| !p.is_empty()) {
            path.push_str(&token::resolve(piece, msg, cfg, time)?);
        }
    }

    // a topic value may itself end in `/`
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }
    Ok(path)
}
