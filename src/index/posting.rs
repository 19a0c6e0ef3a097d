use crate::core::types::DocId;

/// A single document's occurrences of one term. `positions` is strictly
/// ascending and duplicate-free for any posting freshly built off the
/// corpus stream or a completed merge; a posting produced as the
/// complement of a NOT carries no position information and `positions`
/// is empty by design, not a violation of that invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub positions: Vec<u32>,
}

/// Ascending by `doc_id`, no duplicate `doc_id`s.
pub type PostingsList = Vec<Posting>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermPostings {
    pub term: String,
    pub postings: PostingsList,
}

/// Merge two strictly ascending, duplicate-free position lists into one,
/// preserving both properties. Shared recursive structure with
/// [`merge_postings`].
pub fn merge_positions(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                merged.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

/// Sorted-merge union of two postings lists for the *same term*: the
/// `OR` operator, and the cross-block merge of the same term's postings
/// in the k-way merger. On a matching `doc_id`, the merged posting's
/// positions are the sorted union of both sides'.
pub fn union(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            std::cmp::Ordering::Less => {
                merged.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(b[j].clone());
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(Posting {
                    doc_id: a[i].doc_id,
                    positions: merge_positions(&a[i].positions, &b[j].positions),
                });
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

/// The k-way merger's cross-block combination of one term's postings
/// is the same operation as Boolean `OR`.
pub fn merge_postings(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    union(a, b)
}

/// `AND`: sorted-merge intersection by `doc_id`. On a match, positions
/// are the sorted union of both sides' — intersection keeps *all*
/// matched positions for term-attribution/ranking purposes.
pub fn intersect(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(Posting {
                    doc_id: a[i].doc_id,
                    positions: merge_positions(&a[i].positions, &b[j].positions),
                });
                i += 1;
                j += 1;
            }
        }
    }
    result
}

/// `universe \ X`: keep postings from `a` whose `doc_id` does not appear
/// in `b`. Used for `NOT` (§4.9) with `a` the universe's postings.
pub fn subtract(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            std::cmp::Ordering::Less => {
                result.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    result.extend_from_slice(&a[i..]);
    result
}

/// The descriptor's ordered `docIdList`, as a positions-less postings
/// list so `NOT` can reuse the same algebra as every other operator.
pub fn universe_postings(ids: &[DocId]) -> PostingsList {
    ids.iter()
        .map(|&doc_id| Posting {
            doc_id,
            positions: Vec::new(),
        })
        .collect()
}
