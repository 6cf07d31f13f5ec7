//! Handing decorations to the host renderer

use serde::Serialize;

use super::{DecorationSet, SwatchWidget};
use crate::error::SinkError;

/// One positioned annotation, as the host receives it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Mark {
        start: usize,
        end: usize,
        attributes: Vec<(String, String)>,
    },
    Widget {
        position: usize,
        widget: SwatchWidget,
    },
}

impl Annotation {
    /// Offset the annotation is ordered by
    pub fn position(&self) -> usize {
        match self {
            Annotation::Mark { start, .. } => *start,
            Annotation::Widget { position, .. } => *position,
        }
    }
}

/// Host-side receiver of annotations
///
/// Calls arrive sorted by position. A sink may reject a single annotation;
/// the emitting pass skips that decoration and carries on.
pub trait DecorationSink {
    fn add_mark(
        &mut self,
        start: usize,
        end: usize,
        attributes: &[(String, String)],
    ) -> Result<(), SinkError>;

    fn add_widget(&mut self, position: usize, widget: &SwatchWidget) -> Result<(), SinkError>;
}

/// In-memory sink that validates ordering and bounds
#[derive(Debug, Clone, Default)]
pub struct AnnotationList {
    annotations: Vec<Annotation>,
    doc_len: Option<usize>,
    last_end: usize,
}

impl AnnotationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject annotations reaching past `len`
    pub fn with_doc_len(len: usize) -> Self {
        Self {
            doc_len: Some(len),
            ..Self::default()
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    fn check(&self, start: usize, end: usize) -> Result<(), SinkError> {
        if start < self.last_end {
            return Err(SinkError::OutOfOrder {
                position: start,
                previous_end: self.last_end,
            });
        }
        if let Some(len) = self.doc_len {
            if end > len {
                return Err(SinkError::OutOfBounds { start, end, len });
            }
        }
        Ok(())
    }
}

impl DecorationSink for AnnotationList {
    fn add_mark(
        &mut self,
        start: usize,
        end: usize,
        attributes: &[(String, String)],
    ) -> Result<(), SinkError> {
        if start >= end {
            return Err(SinkError::EmptyRange { start, end });
        }
        self.check(start, end)?;
        self.last_end = end;
        self.annotations.push(Annotation::Mark {
            start,
            end,
            attributes: attributes.to_vec(),
        });
        Ok(())
    }

    fn add_widget(&mut self, position: usize, widget: &SwatchWidget) -> Result<(), SinkError> {
        self.check(position, position)?;
        self.last_end = position;
        self.annotations.push(Annotation::Widget {
            position,
            widget: widget.clone(),
        });
        Ok(())
    }
}

/// Outcome of one emit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmitReport {
    pub emitted: usize,
    pub skipped: usize,
}

impl DecorationSet {
    /// Push every decoration into `sink`
    ///
    /// A rejected annotation drops only its own decoration; annotations of
    /// that decoration already accepted stay in the sink.
    pub fn emit<S: DecorationSink + ?Sized>(&self, sink: &mut S) -> EmitReport {
        let mut report = EmitReport::default();

        for decoration in self {
            let result = decoration.annotations().iter().try_for_each(|a| match a {
                Annotation::Mark {
                    start,
                    end,
                    attributes,
                } => sink.add_mark(*start, *end, attributes),
                Annotation::Widget { position, widget } => sink.add_widget(*position, widget),
            });

            match result {
                Ok(()) => report.emitted += 1,
                Err(e) => {
                    tracing::warn!(id = %decoration.id, "Skipping decoration: {}", e);
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(
            emitted = report.emitted,
            skipped = report.skipped,
            "Decorations emitted"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::config::Settings;
    use crate::decoration::decorate;
    use crate::pattern::ColorMatch;

    fn set_of(matches: &[(usize, &str)]) -> DecorationSet {
        let decorations = matches
            .iter()
            .map(|(start, literal)| {
                let m = ColorMatch {
                    start: *start,
                    end: start + literal.len(),
                    literal: literal.to_string(),
                };
                decorate(&m, Rgb::WHITE, &Settings::default())
            })
            .collect();
        DecorationSet::new(decorations)
    }

    #[test]
    fn test_emit_in_order() {
        let set = set_of(&[(10, "#000"), (0, "#fff")]);
        let mut list = AnnotationList::new();
        let report = set.emit(&mut list);
        assert_eq!(report, EmitReport { emitted: 2, skipped: 0 });
        let positions: Vec<usize> = list.annotations().iter().map(|a| a.position()).collect();
        assert_eq!(positions, vec![1, 11]);
    }

    #[test]
    fn test_bad_decoration_is_skipped() {
        let set = set_of(&[(0, "#fff"), (20, "#000")]);
        let mut list = AnnotationList::with_doc_len(10);
        let report = set.emit(&mut list);
        assert_eq!(report, EmitReport { emitted: 1, skipped: 1 });
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_rejects_empty_and_out_of_order() {
        let mut list = AnnotationList::new();
        assert_eq!(
            list.add_mark(3, 3, &[]),
            Err(SinkError::EmptyRange { start: 3, end: 3 })
        );
        list.add_mark(5, 9, &[]).unwrap();
        assert_eq!(
            list.add_mark(6, 8, &[]),
            Err(SinkError::OutOfOrder {
                position: 6,
                previous_end: 9
            })
        );
    }
}
