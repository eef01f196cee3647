//! Encoding and decoding of the per-object `.meta` and `.notes` records.

use quiver_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// File name of the metadata record inside an object directory.
pub const META_FILE: &str = ".meta";

/// File name of the optional notes record inside an object directory.
pub const NOTES_FILE: &str = ".notes";

/// Everything persisted about one object.
///
/// `domain` and `codomain` are both [`ObjectId::null`] for plain nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub name: String,
    pub domain: ObjectId,
    pub codomain: ObjectId,
    pub notes: String,
}

impl ObjectRecord {
    /// A record for a plain, unnamed node.
    pub fn node(id: ObjectId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Returns `true` if either endpoint is set.
    pub fn has_endpoints(&self) -> bool {
        !self.domain.is_null() || !self.codomain.is_null()
    }

    /// Encode the metadata record: id, quoted name, domain, codomain, one
    /// per line, without a trailing newline.
    pub fn encode_meta(&self) -> StoreResult<String> {
        let name = quote(self.id, &self.name)?;
        Ok(format!(
            "{}\n{}\n{}\n{}",
            self.id, name, self.domain, self.codomain
        ))
    }

    /// Encode the notes record, or `None` when there are no notes.
    pub fn encode_notes(&self) -> StoreResult<Option<String>> {
        if self.notes.is_empty() {
            return Ok(None);
        }
        quote(self.id, &self.notes).map(Some)
    }

    /// Decode a metadata record read from the directory of object `dir_id`.
    ///
    /// The returned record carries the identifier embedded in the text, which
    /// may differ from `dir_id`; callers decide what a mismatch means.
    /// Notes are left empty.
    pub fn decode_meta(dir_id: ObjectId, text: &str) -> StoreResult<Self> {
        let corrupt = |reason: String| StoreError::CorruptRecord { id: dir_id, reason };

        let mut lines = text.lines();
        let mut field = |what: &str| {
            lines
                .next()
                .ok_or_else(|| corrupt(format!("missing {what} field")))
        };
        let id = parse_id(dir_id, "id", field("id")?)?;
        let name_line = field("name")?;
        let domain = parse_id(dir_id, "domain", field("domain")?)?;
        let codomain = parse_id(dir_id, "codomain", field("codomain")?)?;
        if lines.any(|l| !l.trim().is_empty()) {
            return Err(corrupt("trailing data after codomain".to_string()));
        }

        Ok(Self {
            id,
            name: unquote(dir_id, "name", name_line)?,
            domain,
            codomain,
            notes: String::new(),
        })
    }

    /// Decode a notes record read from the directory of object `dir_id`.
    pub fn decode_notes(dir_id: ObjectId, text: &str) -> StoreResult<String> {
        unquote(dir_id, "notes", text.trim_end())
    }
}

fn parse_id(dir_id: ObjectId, what: &str, field: &str) -> StoreResult<ObjectId> {
    ObjectId::from_hex(field.trim()).map_err(|e| StoreError::CorruptRecord {
        id: dir_id,
        reason: format!("bad {what} field: {e}"),
    })
}

fn quote(id: ObjectId, text: &str) -> StoreResult<String> {
    serde_json::to_string(text).map_err(|e| StoreError::Encode {
        id,
        reason: e.to_string(),
    })
}

fn unquote(id: ObjectId, what: &str, quoted: &str) -> StoreResult<String> {
    serde_json::from_str::<String>(quoted).map_err(|e| StoreError::CorruptRecord {
        id,
        reason: format!("bad quoted {what}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: u64) -> ObjectId {
        ObjectId::new(raw)
    }

    fn link_record() -> ObjectRecord {
        ObjectRecord {
            id: id(3),
            name: "knows".into(),
            domain: id(1),
            codomain: id(2),
            notes: "since 2019".into(),
        }
    }

    #[test]
    fn meta_layout_for_plain_node() {
        let mut rec = ObjectRecord::node(id(1));
        rec.name = "Alice".into();
        assert_eq!(
            rec.encode_meta().unwrap(),
            "00000001\n\"Alice\"\n00000000\n00000000"
        );
    }

    #[test]
    fn meta_layout_for_link() {
        assert_eq!(
            link_record().encode_meta().unwrap(),
            "00000003\n\"knows\"\n00000001\n00000002"
        );
    }

    #[test]
    fn name_escapes_quotes_and_control_characters() {
        let mut rec = ObjectRecord::node(id(1));
        rec.name = "say \"hi\"\n\tnow\\".into();
        let meta = rec.encode_meta().unwrap();
        assert_eq!(meta.lines().count(), 4);
        assert!(meta.contains(r#""say \"hi\"\n\tnow\\""#));
    }

    #[test]
    fn notes_absent_when_empty() {
        assert_eq!(ObjectRecord::node(id(1)).encode_notes().unwrap(), None);
        assert_eq!(
            link_record().encode_notes().unwrap().as_deref(),
            Some("\"since 2019\"")
        );
    }

    #[test]
    fn decode_reads_all_fields() {
        let rec =
            ObjectRecord::decode_meta(id(3), "00000003\n\"knows\"\n00000001\n00000002").unwrap();
        assert_eq!(rec.id, id(3));
        assert_eq!(rec.name, "knows");
        assert_eq!(rec.domain, id(1));
        assert_eq!(rec.codomain, id(2));
        assert!(rec.notes.is_empty());
        assert!(rec.has_endpoints());
    }

    #[test]
    fn decode_tolerates_trailing_newline() {
        let rec = ObjectRecord::decode_meta(id(1), "00000001\n\"\"\n00000000\n00000000\n").unwrap();
        assert_eq!(rec, ObjectRecord::node(id(1)));
        assert!(!rec.has_endpoints());
    }

    #[test]
    fn decode_reports_embedded_id_verbatim() {
        let rec = ObjectRecord::decode_meta(id(5), "00000007\n\"x\"\n0\n0").unwrap();
        assert_eq!(rec.id, id(7));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let err = ObjectRecord::decode_meta(id(1), "00000001\n\"x\"\n00000000").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { id: i, .. } if i == id(1)));
    }

    #[test]
    fn decode_rejects_bad_hex() {
        let err = ObjectRecord::decode_meta(id(1), "zz\n\"x\"\n0\n0").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
    }

    #[test]
    fn decode_rejects_unquoted_name() {
        let err = ObjectRecord::decode_meta(id(1), "1\nAlice\n0\n0").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
    }

    #[test]
    fn decode_rejects_trailing_garbage() {
        let err = ObjectRecord::decode_meta(id(1), "1\n\"a\"\n0\n0\nextra").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
    }

    #[test]
    fn notes_decode_ignores_trailing_whitespace() {
        let notes = ObjectRecord::decode_notes(id(1), "\"line one\\nline two\"\n").unwrap();
        assert_eq!(notes, "line one\nline two");
    }

    proptest! {
        #[test]
        fn arbitrary_text_survives_quoting(name in any::<String>(), notes in ".+") {
            let rec = ObjectRecord {
                id: id(9),
                name,
                domain: id(4),
                codomain: id(5),
                notes,
            };
            let mut decoded = ObjectRecord::decode_meta(rec.id, &rec.encode_meta().unwrap()).unwrap();
            let notes_text = rec.encode_notes().unwrap().unwrap();
            decoded.notes = ObjectRecord::decode_notes(rec.id, &notes_text).unwrap();
            prop_assert_eq!(decoded, rec);
        }
    }
}
