use tracing::warn;

use crate::model::{Cracked, QuerySet, ResultSet};
use crate::store::Row;

/// Maps positional store rows into a [`ResultSet`].
///
/// Column 0 is the preimage, column 1 the digest. The algorithm is taken from
/// the request, and row order is preserved. A row whose digest was not asked
/// for is dropped, so every result answers a requested hash.
pub fn map_rows(query: &QuerySet, rows: Vec<Row>) -> ResultSet {
    let results = rows
        .into_iter()
        .filter_map(|(preimage, hash)| {
            if query.contains(&hash) {
                Some(Cracked { hash, preimage })
            } else {
                warn!(%hash, algorithm = %query.algorithm(), "store returned unrequested digest");
                None
            }
        })
        .collect();

    ResultSet { algorithm: query.algorithm(), results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Algorithm, AllowList};
    use crate::validate::{DEFAULT_MAX_HASHES, validate};

    fn row(preimage: &str, hash: &str) -> Row {
        (preimage.to_string(), hash.to_string())
    }

    #[test]
    fn test_fields_swap_into_result() {
        let rows = vec![
            row("pw1", "5f4dcc3b5aa765d61d8327deb882cf99"),
            row("pw2", "482c811da5d5b4bc6d497ffa98491e38"),
        ];
        let query = validate(
            "md5",
            ["5f4dcc3b5aa765d61d8327deb882cf99", "482c811da5d5b4bc6d497ffa98491e38"],
            &AllowList::default(),
            DEFAULT_MAX_HASHES,
        )
        .unwrap();

        let set = map_rows(&query, rows);
        assert_eq!(set.algorithm, Algorithm::Md5);
        assert_eq!(
            set.results,
            vec![
                Cracked {
                    hash: "5f4dcc3b5aa765d61d8327deb882cf99".into(),
                    preimage: "pw1".into()
                },
                Cracked {
                    hash: "482c811da5d5b4bc6d497ffa98491e38".into(),
                    preimage: "pw2".into()
                },
            ]
        );
    }

    #[test]
    fn test_store_order_preserved() {
        let query = validate("md5", ["a", "b", "c"], &AllowList::default(), DEFAULT_MAX_HASHES).unwrap();
        let set = map_rows(&query, vec![row("3", "c"), row("1", "a"), row("2", "b")]);
        let hashes: Vec<&str> = set.results.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, ["c", "a", "b"]);
    }

    #[test]
    fn test_no_rows_gives_empty_results() {
        let query = validate("sha1", ["a"], &AllowList::default(), DEFAULT_MAX_HASHES).unwrap();
        let set = map_rows(&query, Vec::new());
        assert_eq!(set.algorithm, Algorithm::Sha1);
        assert!(set.results.is_empty());
    }

    #[test]
    fn test_unrequested_rows_dropped() {
        let query = validate("md5", ["a"], &AllowList::default(), DEFAULT_MAX_HASHES).unwrap();
        let set = map_rows(&query, vec![row("x", "a"), row("y", "zzz")]);
        assert_eq!(set.results.len(), 1);
        assert_eq!(set.results[0].preimage, "x");
    }

    #[test]
    fn test_duplicate_preimages_for_one_hash_kept() {
        // Colliding preimages are both legitimate answers.
        let query = validate("md5", ["a"], &AllowList::default(), DEFAULT_MAX_HASHES).unwrap();
        let set = map_rows(&query, vec![row("x", "a"), row("y", "a")]);
        assert_eq!(set.results.len(), 2);
    }
}
