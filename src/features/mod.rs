pub mod examples;
pub mod normalize;
pub mod row;
pub mod training_set;

pub use examples::{
    parse_json_lines, ContextExample, ExampleSet, ExampleSource, ExampleSourceError,
    JsonLinesSource,
};
pub use normalize::{normalize, normalize_token, try_normalize, Rejection};
pub use row::{ClassLabel, FeatureRow, LabelError, ATTRIBUTE_NAMES, CLASS_ATTRIBUTE, WINDOW};
pub use training_set::{
    build_training_set, schema, Attribute, AttributeKind, FeatureRowBuilder, TrainingSet,
    RELATION,
};
