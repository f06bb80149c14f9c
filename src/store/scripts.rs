use redis::Script;
use std::sync::LazyLock;

pub static COMMENT_DELETE_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/comment_delete.lua")));
