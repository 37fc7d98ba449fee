//! Decides, per asset-bearing element, whether to download, rewrite or skip.

use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

use super::naming::{path_extension, OutputLayout};
use super::rules::{rule_for_tag, AssetRule};
use super::source::SourceUrl;

/// An asset to fetch and the file name it is saved under inside the
/// assets directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: Url,
    pub file_name: String,
}

/// What happens to a single element's link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    /// Points back at the page itself; linked to the saved copy instead
    SelfPage { rewrite: String },

    /// Served from another origin; left alone
    External,

    /// Extension not accepted by the tag's rule; left alone
    UnsupportedExtension,

    /// Not a URL even after resolving against the page origin; left alone
    Unresolvable,

    /// Downloaded and linked to the local copy
    Download { rewrite: String, task: DownloadTask },
}

impl ClassifiedOutcome {
    /// New attribute value, if the element is rewritten
    pub fn rewrite(&self) -> Option<&str> {
        match self {
            ClassifiedOutcome::SelfPage { rewrite } => Some(rewrite),
            ClassifiedOutcome::Download { rewrite, .. } => Some(rewrite),
            _ => None,
        }
    }

    pub fn into_task(self) -> Option<DownloadTask> {
        match self {
            ClassifiedOutcome::Download { task, .. } => Some(task),
            _ => None,
        }
    }
}

/// Classify one link value found on an element governed by `rule`.
///
/// Checks run in a fixed order and the first match wins: foreign origin,
/// self reference, unsupported extension, download.
pub fn classify_reference(
    rule: &AssetRule,
    reference: &str,
    source: &SourceUrl,
    layout: &OutputLayout,
) -> ClassifiedOutcome {
    let resolved = match source.resolve(reference) {
        Ok(url) => url,
        Err(_) => return ClassifiedOutcome::Unresolvable,
    };

    if resolved.origin() != source.origin() {
        return ClassifiedOutcome::External;
    }

    if resolved.path() == source.path() {
        return ClassifiedOutcome::SelfPage {
            rewrite: layout.self_reference(),
        };
    }

    let extension = path_extension(resolved.path());
    if !rule.accepts(&extension) {
        return ClassifiedOutcome::UnsupportedExtension;
    }

    let file_name = layout.asset_file_name(resolved.path());
    ClassifiedOutcome::Download {
        rewrite: layout.asset_reference(&file_name),
        task: DownloadTask {
            url: resolved,
            file_name,
        },
    }
}

/// Rewrite every asset link of `document` and collect the downloads needed.
///
/// Takes the document by value and hands it back rewritten; tasks are in
/// document order.
pub fn classify(
    mut document: Html,
    source: &SourceUrl,
    layout: &OutputLayout,
) -> (Html, Vec<DownloadTask>) {
    let outcomes: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let rule = rule_for_tag(element.value().name())?;
            let reference = element.value().attr(rule.attribute)?;
            let outcome = classify_reference(rule, reference, source, layout);
            debug!("<{} {}=\"{}\"> -> {:?}", rule.tag, rule.attribute, reference, outcome);
            Some((element.id(), rule, outcome))
        })
        .collect();

    let tasks = outcomes
        .into_iter()
        .fold(Vec::new(), |mut tasks, (id, rule, outcome)| {
            if let Some(rewrite) = outcome.rewrite() {
                if let Some(mut node) = document.tree.get_mut(id) {
                    if let Node::Element(element) = node.value() {
                        for (name, value) in element.attrs.iter_mut() {
                            if &*name.local == rule.attribute {
                                *value = rewrite.into();
                            }
                        }
                    }
                }
            }
            tasks.extend(outcome.into_task());
            tasks
        });

    (document, tasks)
}
