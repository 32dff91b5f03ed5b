use crate::error::{Result, TrainerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    /// keys the lesson introduces
    pub keys: &'static str,
    pub text: &'static str,
}

pub static LESSONS: [Lesson; 10] = [
    Lesson {
        id: "home-row",
        title: "Home row",
        keys: "asdfjkl;",
        text: "asdf jkl; asdf jkl; fjdk slal; dad sad lad fall; ask a lad; a sad lass falls",
    },
    Lesson {
        id: "home-row-reach",
        title: "Home row reach: g and h",
        keys: "gh",
        text: "fgf jhj gas has hag dash glad flash; had a gala; shall hall gall flag",
    },
    Lesson {
        id: "top-row-left",
        title: "Top row, left hand",
        keys: "qwert",
        text: "qaq waw ede rfr tgt; we were there; tree rest water sweet great treat",
    },
    Lesson {
        id: "top-row-right",
        title: "Top row, right hand",
        keys: "yuiop",
        text: "yjy uju iki olo p;p; your quiet pool; toy pupil poetry yip oil pout",
    },
    Lesson {
        id: "bottom-row-left",
        title: "Bottom row, left hand",
        keys: "zxcvb",
        text: "zaz xsx cdc vfv bgb; cab vex zebra box cave brave; a vexed cab",
    },
    Lesson {
        id: "bottom-row-right",
        title: "Bottom row, right hand",
        keys: "nm,./",
        text: "njn mjm k,k l.l ;/; man, moon, name. many men. and/or; no, no.",
    },
    Lesson {
        id: "numbers",
        title: "Number row",
        keys: "1234567890",
        text: "1 2 3 4 5 6 7 8 9 0; 10 20 30 40; 1984 2024 365 42; call 555 0100",
    },
    Lesson {
        id: "capitals",
        title: "Capitals with shift",
        keys: "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        text: "Alice Bob Carol Dave; New York; Paris and Rome; The Quick Fox Jumps",
    },
    Lesson {
        id: "punctuation",
        title: "Punctuation",
        keys: ",.;:!?'\"-()",
        text: "Yes, no; maybe: well! Why? It's done - isn't it? (yes) \"fine,\" she said.",
    },
    Lesson {
        id: "sentences",
        title: "Full sentences",
        keys: "",
        text: "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs.",
    },
];

/// Look a lesson up by id or by its 1-based position in the catalog
pub fn find(key: &str) -> Result<&'static Lesson> {
    let by_number = key
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| LESSONS.get(idx));

    by_number
        .or_else(|| LESSONS.iter().find(|l| l.id.eq_ignore_ascii_case(key)))
        .ok_or_else(|| TrainerError::UnknownLesson(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_texts_present() {
        let ids: HashSet<&str> = LESSONS.iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), LESSONS.len());
        assert!(LESSONS.iter().all(|l| !l.text.is_empty()));
    }

    #[test]
    fn find_by_id_or_number() {
        assert_eq!(find("home-row").unwrap().id, "home-row");
        assert_eq!(find("HOME-ROW").unwrap().id, "home-row");
        assert_eq!(find("1").unwrap().id, "home-row");
        assert_eq!(find("10").unwrap().id, "sentences");
    }

    #[test]
    fn unknown_lessons_are_errors() {
        assert_matches!(find("0"), Err(TrainerError::UnknownLesson(_)));
        assert_matches!(find("11"), Err(TrainerError::UnknownLesson(_)));
        assert_matches!(find("nope"), Err(TrainerError::UnknownLesson(k)) if k == "nope");
    }
}
