//! Well-known classes of the Kotlin standard library.

use super::ClassName;

const KOTLIN: &str = "kotlin";
const COLLECTIONS: &str = "kotlin.collections";

pub fn any() -> ClassName {
    ClassName::new(KOTLIN, "Any")
}

pub fn unit() -> ClassName {
    ClassName::new(KOTLIN, "Unit")
}

pub fn nothing() -> ClassName {
    ClassName::new(KOTLIN, "Nothing")
}

pub fn string() -> ClassName {
    ClassName::new(KOTLIN, "String")
}

pub fn char() -> ClassName {
    ClassName::new(KOTLIN, "Char")
}

pub fn boolean() -> ClassName {
    ClassName::new(KOTLIN, "Boolean")
}

pub fn byte() -> ClassName {
    ClassName::new(KOTLIN, "Byte")
}

pub fn short() -> ClassName {
    ClassName::new(KOTLIN, "Short")
}

pub fn int() -> ClassName {
    ClassName::new(KOTLIN, "Int")
}

pub fn long() -> ClassName {
    ClassName::new(KOTLIN, "Long")
}

pub fn float() -> ClassName {
    ClassName::new(KOTLIN, "Float")
}

pub fn double() -> ClassName {
    ClassName::new(KOTLIN, "Double")
}

pub fn array() -> ClassName {
    ClassName::new(KOTLIN, "Array")
}

pub fn list() -> ClassName {
    ClassName::new(COLLECTIONS, "List")
}

pub fn mutable_list() -> ClassName {
    ClassName::new(COLLECTIONS, "MutableList")
}

pub fn set() -> ClassName {
    ClassName::new(COLLECTIONS, "Set")
}

pub fn map() -> ClassName {
    ClassName::new(COLLECTIONS, "Map")
}

pub fn mutable_map() -> ClassName {
    ClassName::new(COLLECTIONS, "MutableMap")
}

/// Annotation classes.
pub mod annotations {
    use super::{ClassName, KOTLIN};

    pub fn deprecated() -> ClassName {
        ClassName::new(KOTLIN, "Deprecated")
    }

    pub fn suppress() -> ClassName {
        ClassName::new(KOTLIN, "Suppress")
    }

    pub fn jvm_static() -> ClassName {
        ClassName::new("kotlin.jvm", "JvmStatic")
    }
}
