//! Kind classifier
//!
//! Maps a PascalCase kind to the lowercase plural used in CRD names
//! (`{plural}.{group}`) and in route parameters. Both call sites go through
//! [`plural_of`] so they can never disagree.

/// Kinds whose plural is not `lowercase(kind) + "s"`, or that we pin explicitly
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("Bucket", "buckets"),
    ("GitRepository", "gitrepositories"),
    ("HelmRelease", "helmreleases"),
    ("HelmRepository", "helmrepositories"),
    ("Kustomization", "kustomizations"),
    ("OCIRepository", "ocirepositories"),
];

/// Plural collection name for a kind
pub fn plural_of(kind: &str) -> String {
    IRREGULAR_PLURALS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, plural)| (*plural).to_string())
        .unwrap_or_else(|| format!("{}s", kind.to_lowercase()))
}
