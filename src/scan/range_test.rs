#[cfg(test)]
mod tests {
    use super::super::*;
    use anyhow::Result;
    use std::sync::Mutex;

    /// Records every range it is asked for.
    struct RecordingRanges {
        values: Vec<String>,
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl RangeSource for RecordingRanges {
        async fn fetch_range(
            &self,
            _key: &str,
            _db: u32,
            start: usize,
            stop: usize,
        ) -> Result<Vec<String>> {
            self.calls.lock().unwrap().push((start, stop));
            let end = (stop + 1).min(self.values.len());
            Ok(self.values.get(start..end).map(<[String]>::to_vec).unwrap_or_default())
        }
    }

    fn recording(count: usize) -> RecordingRanges {
        RecordingRanges {
            values: (0..count).map(|i| format!("item{i}")).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_ranges_advance_without_overlap() {
        let key = KeyRef::new("jobs", 1);
        let session = ScanSession::new(RangePager::new(recording(7)), key, 3);

        let mut all = Vec::new();
        while session.has_more() {
            all.extend(session.load_next().await.unwrap());
        }

        let values: Vec<String> = all.into_iter().map(|e| e.value).collect();
        assert_eq!(values, (0..7).map(|i| format!("item{i}")).collect::<Vec<_>>());
        let calls = session.source().ranges().calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(0, 2), (3, 5), (6, 8)]);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_read() {
        let key = KeyRef::new("jobs", 1);
        let session = ScanSession::new(RangePager::new(recording(4)), key, 2);

        assert_eq!(session.load_next().await.unwrap().len(), 2);
        assert_eq!(session.cursor().token(), "2");
        assert_eq!(session.load_next().await.unwrap().len(), 2);
        assert_eq!(session.cursor().token(), "4");
        assert!(session.load_next().await.unwrap().is_empty());
        assert!(!session.has_more());
        assert_eq!(session.len(), 4);
    }

    #[tokio::test]
    async fn test_memory_lists_page_through_range_pager() {
        let key = KeyRef::new("queue", 0);
        let memory = MemorySource::new().with_collection(
            key.clone(),
            ["a", "b", "c"].into_iter().map(ListElement::new).collect(),
        );
        let pager = RangePager::new(memory);

        let page = pager
            .fetch_page(PageRequest {
                key: "queue".to_string(),
                db: 0,
                cursor: "1".to_string(),
                page_size: 5,
                filter: Some("ignored".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(page.cursor, "0");
        assert_eq!(page.items, vec![ListElement::new("b"), ListElement::new("c")]);
        assert_eq!(pager.into_inner().request_count(), 1);
    }
}
