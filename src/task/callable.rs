use super::registry::DetectorFn;
use super::{EntityIter, TaskArgs};

/// Raw finder for a detector expressed as a callable.
///
/// The callable reports substrings, not positions, so every returned value
/// is located again in the text: each non-overlapping occurrence of it
/// becomes one entity. A value that appears twice in the text is therefore
/// reported twice even if the callable meant only one of them.
#[derive(Clone)]
pub struct CallableTask {
    call_name: String,
    call: DetectorFn,
}

impl std::fmt::Debug for CallableTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallableTask")
            .field("call", &self.call_name)
            .finish()
    }
}

impl CallableTask {
    pub fn new(call_name: &str, call: DetectorFn) -> Self {
        Self {
            call_name: call_name.to_string(),
            call,
        }
    }

    pub fn call_name(&self) -> &str {
        &self.call_name
    }

    pub fn find<'a>(&'a self, args: &'a TaskArgs, text: &'a str, chunk_id: &'a str) -> EntityIter<'a> {
        let found = (self.call)(text, &args.kwargs);
        Box::new(
            found
                .into_iter()
                .filter(move |value| {
                    if value.is_empty() {
                        tracing::warn!("callable '{}' returned an empty match, skipped", self.call_name);
                    }
                    !value.is_empty()
                })
                .flat_map(move |value| {
                    let positions: Vec<usize> =
                        text.match_indices(value.as_str()).map(|(pos, _)| pos).collect();
                    positions
                        .into_iter()
                        .map(move |pos| args.entity(value.clone(), chunk_id, pos))
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PiiCategory;
    use crate::task::registry::Kwargs;
    use std::sync::Arc;

    fn args() -> TaskArgs {
        TaskArgs::new(PiiCategory::BitcoinAddress, "*", None, "wallet", "wallet")
    }

    #[test]
    fn test_relocates_every_occurrence() {
        let task = CallableTask::new("fixed", Arc::new(|_: &str, _: &Kwargs| vec!["ab".to_string()]));
        let args = args();
        let found: Vec<_> = task.find(&args, "ab xx ab abab", "c").map(|e| e.pos).collect();
        assert_eq!(found, vec![0, 6, 9, 11]);
    }

    #[test]
    fn test_value_not_in_text_yields_nothing() {
        let task = CallableTask::new("fixed", Arc::new(|_: &str, _: &Kwargs| vec!["zz".to_string()]));
        let args = args();
        assert_eq!(task.find(&args, "nothing here", "c").count(), 0);
    }

    #[test]
    fn test_empty_value_skipped() {
        let task = CallableTask::new(
            "empty",
            Arc::new(|_: &str, _: &Kwargs| vec![String::new(), "x".to_string()]),
        );
        let args = args();
        let found: Vec<_> = task.find(&args, "x", "c").collect();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_kwargs_reach_callable() {
        let task = CallableTask::new(
            "kw",
            Arc::new(|_: &str, kw: &Kwargs| {
                kw.get("needle")
                    .and_then(|v| v.as_str())
                    .map(|s| vec![s.to_string()])
                    .unwrap_or_default()
            }),
        );
        let mut args = args();
        args.kwargs.insert("needle".into(), serde_json::json!("abc"));
        let found: Vec<_> = task.find(&args, "xabcx", "c").collect();
        assert_eq!(found[0].pos, 1);
    }
}
