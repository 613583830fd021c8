pub mod gate;
pub mod model;

pub use gate::{classify, Classification, PoseLabel, UNCERTAIN_TEXT, VARIANT_COUNT, VARIANT_LABELS};
pub use model::{pose_features, FeatureScaler, PoseClassifier, FEATURE_COUNT};
