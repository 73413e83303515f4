use crate::catalog::Record;

/// Keep records whose name, category or id contains `query` (case-insensitive).
/// An empty query keeps everything.
pub fn filter_records<'a>(records: Vec<&'a Record>, query: &str) -> Vec<&'a Record> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&q)
                || r.category.as_str().to_lowercase().contains(&q)
                || r.id.to_string().contains(&q)
        })
        .collect()
}
