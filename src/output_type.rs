/// What the CLI prints for a fetched transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// The full response document as pretty-printed JSON.
    #[default]
    Json,

    /// Only the concatenated transcript text.
    Text,
}
