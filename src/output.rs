//! JSON rendering of query results.

use serde::Serialize;

/// Renders `value` as a single line of JSON, or pretty-printed.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessRecord, ProcessTreeNode, RunState};

    #[test]
    fn test_record_field_order() {
        let record = ProcessRecord {
            pid: 12,
            exe: "/bin/sh".into(),
            cwd: "/".into(),
            base_address: 4096,
            state: RunState::Sleeping,
            cmdline: vec!["sh".into(), "-c".into(), "a \"quoted\" arg".into()],
        };

        let json = to_json(&[record], false).expect("serialize");
        assert_eq!(
            json,
            r#"[{"pid":12,"exe":"/bin/sh","cwd":"/","base_address":4096,"state":"S","cmdline":["sh","-c","a \"quoted\" arg"]}]"#
        );
    }

    #[test]
    fn test_tree_shape() {
        let tree = ProcessTreeNode {
            pid: 1,
            name: "init".into(),
            children: vec![ProcessTreeNode {
                pid: 2,
                name: "child".into(),
                children: vec![],
            }],
        };

        let json = to_json(&vec![tree], false).expect("serialize");
        assert_eq!(
            json,
            r#"[{"pid":1,"name":"init","children":[{"pid":2,"name":"child","children":[]}]}]"#
        );
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let json = to_json(&vec![1u32, 2], true).expect("serialize");
        assert!(json.contains('\n'));
    }
}
