//! Structural matching of serialized host method source
//!
//! The host's method names are minified and change on any deployment; the
//! only durable signal is the shape of a method's serialized body. Two
//! shapes are recognized:
//! - volume read: `this.X.getVolume()`, a fixed method name invoked
//!   directly on a named field
//! - layout refresh: `this.X.get(k).Y(this.Z)`, an entry fetched from a
//!   map-like field using another field as the key, then a method invoked
//!   on the result
//!
//! Matching is purely syntactic; a non-match is the expected outcome for
//! almost every scanned method and stays silent.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// The two call shapes the instrumentation knows how to hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookShape {
    VolumeRead,
    LayoutRefresh,
}

/// Field names a matched shape depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookDescriptor {
    /// `this.<reader_field>.getVolume()`
    VolumeRead { reader_field: String },
    /// `this.<map_field>.get(_).<entry_method>(this._)`
    LayoutRefresh {
        map_field: String,
        entry_method: String,
    },
}

impl HookDescriptor {
    pub fn shape(&self) -> HookShape {
        match self {
            HookDescriptor::VolumeRead { .. } => HookShape::VolumeRead,
            HookDescriptor::LayoutRefresh { .. } => HookShape::LayoutRefresh,
        }
    }
}

/// Errors for structural matching
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// One body matched the same shape twice with conflicting field names.
    /// The heuristic is assumed unambiguous per host version, so this must
    /// be reported rather than silently picking one.
    #[error("conflicting {shape:?} captures in one method body: {first} vs {second}")]
    AmbiguousShape {
        shape: HookShape,
        first: String,
        second: String,
    },
}

fn volume_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"this\.([A-Za-z]+)\.getVolume\(\)").expect("volume shape regex")
    })
}

fn layout_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"this\.([A-Za-z]+)\.get\([A-Za-z]+\)\.([A-Za-z]+)\(this\.[A-Za-z]+\)")
            .expect("layout shape regex")
    })
}

/// Match a candidate method body against the known shapes.
///
/// Returns `Ok(None)` for the common case of an unrelated method. The
/// layout shape is checked first; it is strictly more specific than the
/// volume shape.
pub fn match_method_source(source: &str) -> Result<Option<HookDescriptor>, PatternError> {
    if let Some(descriptor) = match_layout(source)? {
        return Ok(Some(descriptor));
    }
    if let Some(descriptor) = match_volume(source)? {
        return Ok(Some(descriptor));
    }
    Ok(None)
}

fn match_volume(source: &str) -> Result<Option<HookDescriptor>, PatternError> {
    let mut found: Option<String> = None;
    for caps in volume_re().captures_iter(source) {
        let field = caps[1].to_string();
        match &found {
            Some(prev) if *prev != field => {
                return Err(PatternError::AmbiguousShape {
                    shape: HookShape::VolumeRead,
                    first: prev.clone(),
                    second: field,
                });
            }
            _ => found = Some(field),
        }
    }
    Ok(found.map(|reader_field| HookDescriptor::VolumeRead { reader_field }))
}

fn match_layout(source: &str) -> Result<Option<HookDescriptor>, PatternError> {
    let mut found: Option<(String, String)> = None;
    for caps in layout_re().captures_iter(source) {
        let capture = (caps[1].to_string(), caps[2].to_string());
        match &found {
            Some(prev) if *prev != capture => {
                return Err(PatternError::AmbiguousShape {
                    shape: HookShape::LayoutRefresh,
                    first: format!("{}.{}", prev.0, prev.1),
                    second: format!("{}.{}", capture.0, capture.1),
                });
            }
            _ => found = Some(capture),
        }
    }
    Ok(found.map(|(map_field, entry_method)| HookDescriptor::LayoutRefresh {
        map_field,
        entry_method,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_shape_matches() {
        let source = "function(){if(this.Ab.isDisposed())return;return this.wRa.getVolume()}";
        let descriptor = match_method_source(source).unwrap();
        assert_eq!(
            descriptor,
            Some(HookDescriptor::VolumeRead {
                reader_field: "wRa".to_string()
            })
        );
    }

    #[test]
    fn test_layout_shape_matches() {
        let source = "function(a){return this.Wc.get(a).am(this.vb)}";
        let descriptor = match_method_source(source).unwrap();
        assert_eq!(
            descriptor,
            Some(HookDescriptor::LayoutRefresh {
                map_field: "Wc".to_string(),
                entry_method: "am".to_string()
            })
        );
    }

    #[test]
    fn test_unrelated_method_is_silent() {
        assert_eq!(match_method_source("function(){return 42}").unwrap(), None);
        assert_eq!(match_method_source("").unwrap(), None);
    }

    #[test]
    fn test_layout_preferred_when_both_shapes_present() {
        let source = "function(a){this.Wc.get(a).am(this.vb);this.kq.getVolume()}";
        let descriptor = match_method_source(source).unwrap();
        assert_eq!(descriptor.map(|d| d.shape()), Some(HookShape::LayoutRefresh));
    }

    #[test]
    fn test_repeated_identical_capture_is_not_ambiguous() {
        let source = "function(){this.kq.getVolume();this.kq.getVolume()}";
        let descriptor = match_method_source(source).unwrap();
        assert_eq!(
            descriptor,
            Some(HookDescriptor::VolumeRead {
                reader_field: "kq".to_string()
            })
        );
    }

    #[test]
    fn test_conflicting_volume_fields_error() {
        let source = "function(){this.ab.getVolume();this.cd.getVolume()}";
        let err = match_method_source(source).unwrap_err();
        assert_eq!(
            err,
            PatternError::AmbiguousShape {
                shape: HookShape::VolumeRead,
                first: "ab".to_string(),
                second: "cd".to_string(),
            }
        );
    }

    #[test]
    fn test_conflicting_layout_fields_error() {
        let source = "function(a){this.Wc.get(a).am(this.vb);this.Qx.get(a).zz(this.vb)}";
        let err = match_method_source(source).unwrap_err();
        assert!(matches!(
            err,
            PatternError::AmbiguousShape {
                shape: HookShape::LayoutRefresh,
                ..
            }
        ));
    }

    #[test]
    fn test_minified_single_letter_names() {
        let source = "function(){return this.a.getVolume()}";
        assert_eq!(
            match_method_source(source).unwrap(),
            Some(HookDescriptor::VolumeRead {
                reader_field: "a".to_string()
            })
        );
    }
}
