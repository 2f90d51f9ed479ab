use crate::error::{DialectError, Result};

const IDENTIFIER_PREFIXES: [&str; 3] = [
    "EPSG:",
    "urn:ogc:def:crs:EPSG:",
    "http://www.opengis.net/def/crs/EPSG/0/",
];

/// EPSG code of a coordinate reference system.
///
/// Accepts the usual identifier spellings (`EPSG:4326`,
/// `urn:ogc:def:crs:EPSG::4326`, `http://www.opengis.net/def/crs/EPSG/0/4326`)
/// and WKT definitions carrying an `AUTHORITY["EPSG", ...]` or
/// `ID["EPSG", ...]` clause on the outermost object.
///
/// Returns `Ok(None)` when the definition names no EPSG authority, and an
/// error when it does but the code cannot be read.
pub fn lookup_epsg_code(crs: &str) -> Result<Option<i32>> {
    let crs = crs.trim();
    for prefix in IDENTIFIER_PREFIXES {
        if let Some(code) = strip_prefix_ignore_case(crs, prefix) {
            // URNs may carry a version segment before the code.
            let code = code.rsplit(':').next().unwrap_or(code);
            return parse_code(crs, code).map(Some);
        }
    }
    if crs.contains('[') {
        return lookup_wkt_authority(crs);
    }
    Ok(None)
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

fn parse_code(crs: &str, code: &str) -> Result<i32> {
    let code = code.trim().trim_matches('"');
    code.parse::<i32>()
        .ok()
        .filter(|code| *code > 0)
        .ok_or_else(|| DialectError::InvalidCrs(format!("invalid EPSG code in {crs:?}")))
}

/// Last authority clause at nesting depth one, i.e. the one belonging to the
/// outermost object.
fn lookup_wkt_authority(wkt: &str) -> Result<Option<i32>> {
    let mut depth = 0usize;
    let mut word_start = 0usize;
    let mut found = None;

    for (idx, ch) in wkt.char_indices() {
        match ch {
            '[' | '(' => {
                let keyword = wkt[word_start..idx].trim();
                if depth == 1
                    && (keyword.eq_ignore_ascii_case("AUTHORITY")
                        || keyword.eq_ignore_ascii_case("ID"))
                {
                    found = Some(idx + 1);
                }
                depth += 1;
                word_start = idx + 1;
            }
            ']' | ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| unbalanced(wkt))?;
                word_start = idx + 1;
            }
            ',' => word_start = idx + 1,
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced(wkt));
    }

    let Some(start) = found else {
        return Ok(None);
    };
    let end = wkt[start..]
        .find([']', ')'])
        .map(|offset| start + offset)
        .ok_or_else(|| unbalanced(wkt))?;
    let mut parts = wkt[start..end].split(',');
    let authority = parts.next().unwrap_or_default().trim().trim_matches('"');
    if !authority.eq_ignore_ascii_case("EPSG") {
        return Ok(None);
    }
    let code = parts.next().unwrap_or_default();
    parse_code(wkt, code).map(Some)
}

fn unbalanced(wkt: &str) -> DialectError {
    DialectError::InvalidCrs(format!("unbalanced brackets in {wkt:?}"))
}
