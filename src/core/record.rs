// Buffered record slot: one row-reader outcome tagged with its stream position.
use std::sync::Arc;

#[derive(Debug)]
pub enum Record<E> {
    /// Nothing consumed yet. Never a real row.
    Start,
    Row { fields: Vec<String>, index: usize },
    /// `index` is the number of rows produced before the input ran out.
    End { index: usize },
    /// Shared so a peek can chain the cause without giving up the slot.
    ParsingError { error: Arc<E>, index: usize },
}

impl<E> Record<E> {
    pub fn index(&self) -> usize {
        match self {
            Record::Start => 0,
            Record::Row { index, .. }
            | Record::End { index }
            | Record::ParsingError { index, .. } => *index,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Record::End { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::Record;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn index_is_carried_by_every_case() {
        let start: Record<io::Error> = Record::Start;
        let row: Record<io::Error> = Record::Row {
            fields: vec!["a".to_string()],
            index: 2,
        };
        let end: Record<io::Error> = Record::End { index: 5 };
        let failed = Record::ParsingError {
            error: Arc::new(io::Error::other("bad row")),
            index: 3,
        };

        assert_eq!(start.index(), 0);
        assert_eq!(row.index(), 2);
        assert_eq!(end.index(), 5);
        assert_eq!(failed.index(), 3);
        assert!(end.is_end());
        assert!(!row.is_end());
    }
}
