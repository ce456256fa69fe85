//! Unit tests for database key types

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use crate::db::types::{PairKey, PathString, TagId, TitleId};
    use std::path::PathBuf;

    #[test]
    fn test_id_bytes_sort_numerically() {
        let small = TitleId(9).to_bytes();
        let large = TitleId(256).to_bytes();
        assert!(small < large);
    }

    #[test]
    fn test_id_from_bytes_rejects_wrong_length() {
        let result = TagId::from_bytes(&[1, 2, 3]);
        assert!(matches!(result, Err(DbError::Corrupt(_))));
    }

    #[test]
    fn test_id_parse_trims_input() {
        let id: TitleId = " 12 ".parse().unwrap();
        assert_eq!(id, TitleId(12));
        assert!("abc".parse::<TitleId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(TitleId(5).to_string(), "5");
        assert_eq!(TagId(0).to_string(), "0");
    }

    #[test]
    fn test_pair_key_prefix_is_first_id() {
        let key = PairKey::new(3, 77).to_bytes();
        assert_eq!(&key[..8], &TitleId(3).to_bytes());
        assert_eq!(&key[8..], &TagId(77).to_bytes());
    }

    #[test]
    fn test_pair_key_from_bytes() {
        let key = PairKey::new(u64::MAX, 1);
        let restored = PairKey::from_bytes(&key.to_bytes()).unwrap();
        assert_eq!(restored.first, u64::MAX);
        assert_eq!(restored.second, 1);
    }

    #[test]
    fn test_pair_key_rejects_short_input() {
        assert!(matches!(PairKey::from_bytes(&[0; 12]), Err(DbError::Corrupt(_))));
    }

    #[test]
    fn test_path_string_valid() {
        let path_str = PathString::new("movies/Alien (1979)").unwrap();
        assert_eq!(&*path_str, "movies/Alien (1979)");
        assert_eq!(path_str.into_string(), "movies/Alien (1979)");
    }

    #[test]
    fn test_path_string_try_from_pathbuf() {
        let path = PathBuf::from("a/b");
        let path_str = PathString::try_from(path).unwrap();
        assert_eq!(path_str.as_ref(), "a/b");
    }

    #[test]
    fn test_path_string_normalizes_separators() {
        assert_eq!(&*PathString::new("/m/Alien/").unwrap(), "/m/Alien");
        assert_eq!(&*PathString::new("/m/./Alien").unwrap(), "/m/Alien");
        assert_eq!(&*PathString::new("/m//Alien").unwrap(), "/m/Alien");
    }

    #[cfg(unix)]
    #[test]
    fn test_path_string_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let invalid = OsStr::from_bytes(&[0x66, 0x6f, 0x80, 0x6f]);
        let result = PathString::new(invalid);
        assert!(matches!(result, Err(DbError::PathError(_))));
    }
}
