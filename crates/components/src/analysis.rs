//! Adding component scores to aligned events.

use eventca_math::StandardScaler;
use eventca_primitives::{
    AlignedEvents, ComponentMethod, ComponentName, OffsetLabel, PrimitiveError, ScoredEvents,
};
use eventca_traits::{Decomposed, Decomposition, Diagnostics, FittedTransform, TransformError};
use ndarray::{Array2, ArrayView1};

use crate::{
    ComponentConfig, ComponentError, ComponentPipeline, IndependentDecomposer,
    OrthogonalDecomposer, Projection,
};

/// Everything learned by [`add_components`] besides the scores.
#[derive(Debug, Clone)]
pub struct ComponentArtifact {
    method: ComponentMethod,
    names: Vec<ComponentName>,
    offsets: Vec<OffsetLabel>,
    loadings: Array2<f64>,
    diagnostics: Diagnostics,
    pipeline: Option<ComponentPipeline>,
}

impl ComponentArtifact {
    /// Artifact of a fit over zero rows: `0 x W` loadings and no pipeline.
    fn empty(method: ComponentMethod, names: Vec<ComponentName>, offsets: &[OffsetLabel]) -> Self {
        Self {
            method,
            names,
            offsets: offsets.to_vec(),
            loadings: Array2::zeros((0, offsets.len())),
            diagnostics: Diagnostics::empty(method, offsets.len()),
            pipeline: None,
        }
    }

    /// Decomposition that produced this artifact.
    #[must_use]
    pub const fn method(&self) -> ComponentMethod {
        self.method
    }

    /// Component names, in loading-row order.
    #[must_use]
    pub fn names(&self) -> &[ComponentName] {
        &self.names
    }

    /// Offset labels, in loading-column order.
    #[must_use]
    pub fn offsets(&self) -> &[OffsetLabel] {
        &self.offsets
    }

    /// Loading matrix (`k x W`); row `i` is component `i` across all offsets.
    #[must_use]
    pub const fn loadings(&self) -> &Array2<f64> {
        &self.loadings
    }

    /// Loadings of one component by name (`"PC1"`, `"IC2"`, ...).
    #[must_use]
    pub fn loading(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        if self.loadings.nrows() != self.names.len() {
            return None;
        }
        self.names.iter().position(|n| n.to_string() == name).map(|i| self.loadings.row(i))
    }

    /// Method-specific fit diagnostics.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Fitted pipeline, absent when nothing was fitted.
    #[must_use]
    pub const fn pipeline(&self) -> Option<&ComponentPipeline> {
        self.pipeline.as_ref()
    }

    /// Score new aligned events with the fitted pipeline, without refitting.
    ///
    /// # Errors
    /// Returns `NotFitted` for an artifact of an empty fit, or `MissingColumn`
    /// if the events lack one of the fitted offsets.
    pub fn transform(&self, aligned: &AlignedEvents) -> Result<Array2<f64>, ComponentError> {
        let pipeline = self.pipeline.as_ref().ok_or(TransformError::NotFitted)?;
        let matrix = select_offsets(aligned, &self.offsets)?;
        Ok(pipeline.transform(&matrix)?)
    }
}

fn select_offsets(
    aligned: &AlignedEvents,
    labels: &[OffsetLabel],
) -> Result<Array2<f64>, ComponentError> {
    aligned.select(labels).map_err(|e| match e {
        PrimitiveError::UnknownOffset(label) => ComponentError::MissingColumn(label),
        other => ComponentError::Primitive(other),
    })
}

fn fit_with<D: Decomposition>(
    decomposer: &D,
    data: &Array2<f64>,
) -> Result<Decomposed, ComponentError> {
    tracing::debug!(
        method = %decomposer.method(),
        components = decomposer.n_components(),
        rows = data.nrows(),
        "fitting decomposition"
    );
    Ok(decomposer.fit(data)?)
}

/// Standardize the offset columns and append `k` component scores to each event.
///
/// The scaler and the decomposition are both fitted on exactly the rows and
/// columns supplied. Score columns are named `PC1..PCk` or `IC1..ICk` and keep
/// the input row order.
///
/// # Returns
/// Tuple of (scored events, artifact with loadings, diagnostics, and pipeline)
///
/// # Errors
/// Returns `ComponentError` if `n_components` is zero or exceeds the number of
/// offsets or rows, an offset label is missing, or the fit fails.
pub fn add_components(
    aligned: &AlignedEvents,
    offset_labels: &[OffsetLabel],
    config: &ComponentConfig,
) -> Result<(ScoredEvents, ComponentArtifact), ComponentError> {
    let method = config.method;
    let k = config.n_components;
    let width = offset_labels.len();
    if k == 0 || k > width {
        return Err(ComponentError::InvalidParameter(format!(
            "n_components must be between 1 and {width}, got {k}"
        )));
    }

    let matrix = select_offsets(aligned, offset_labels)?;
    let names = ComponentName::sequence(method, k);

    if matrix.nrows() == 0 {
        tracing::debug!(%method, components = k, "no events to decompose");
        let scored = ScoredEvents::new(aligned.clone(), names.clone(), Array2::zeros((0, k)))?;
        return Ok((scored, ComponentArtifact::empty(method, names, offset_labels)));
    }

    let scaler = StandardScaler::fit(&matrix)?;
    let standardized = scaler.transform(&matrix)?;

    let decomposed = match method {
        ComponentMethod::Orthogonal => {
            fit_with(&OrthogonalDecomposer::with_config(config.orthogonal()), &standardized)?
        }
        ComponentMethod::IndependentSource => {
            fit_with(&IndependentDecomposer::with_config(config.independent()), &standardized)?
        }
    };

    let pipeline = ComponentPipeline::new(scaler, Projection::from(&decomposed))?;

    tracing::debug!(
        %method,
        rows = matrix.nrows(),
        offsets = width,
        components = k,
        "added components"
    );

    let Decomposed { loadings, scores, diagnostics, .. } = decomposed;
    let scored = ScoredEvents::new(aligned.clone(), names.clone(), scores)?;
    let artifact = ComponentArtifact {
        method,
        names,
        offsets: offset_labels.to_vec(),
        loadings,
        diagnostics,
        pipeline: Some(pipeline),
    };

    Ok((scored, artifact))
}

/// Add `PC1..PCk` principal-component scores.
///
/// # Errors
/// See [`add_components`].
pub fn add_pcs(
    aligned: &AlignedEvents,
    offset_labels: &[OffsetLabel],
    n_components: usize,
) -> Result<(ScoredEvents, ComponentArtifact), ComponentError> {
    add_components(
        aligned,
        offset_labels,
        &ComponentConfig::new(ComponentMethod::Orthogonal, n_components),
    )
}

/// Add `IC1..ICk` independent-component scores (seed 42).
///
/// # Errors
/// See [`add_components`].
pub fn add_ics(
    aligned: &AlignedEvents,
    offset_labels: &[OffsetLabel],
    n_components: usize,
) -> Result<(ScoredEvents, ComponentArtifact), ComponentError> {
    add_components(
        aligned,
        offset_labels,
        &ComponentConfig::new(ComponentMethod::IndependentSource, n_components),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use eventca_primitives::{Date, EventTable, ReturnSeries};
    use eventca_window::{WindowConfig, construct_event_windows};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    fn day(i: usize) -> Date {
        Date::from_num_days_from_ce_opt(738_886 + i as i32).unwrap()
    }

    /// Events aligned to a noisy return series with a small window.
    fn windowed_events() -> (AlignedEvents, Vec<OffsetLabel>) {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let n = 600;
        let returns: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>() * 0.04 - 0.02).collect();
        let series = ReturnSeries::new((0..n).map(day).collect(), returns).unwrap();
        let events = EventTable::new((30..570).step_by(6).map(day).collect());
        construct_event_windows(&events, &series, &WindowConfig::new(-5, 5, Some(4))).unwrap()
    }

    /// Aligned events whose offset columns mix three sub-Gaussian sources.
    fn mixed_events(rows: usize) -> (AlignedEvents, Vec<OffsetLabel>) {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let labels = OffsetLabel::range(-3, 3);
        let sources = Array2::from_shape_fn((rows, 3), |(i, j)| match j {
            1 => (i as f64 * 0.11).sin().signum(),
            _ => rng.r#gen::<f64>() * 2.0 - 1.0,
        });
        let mixing = Array2::from_shape_fn((labels.len(), 3), |(o, s)| {
            1.0 + ((o * 3 + s * 5) % 7) as f64 * 0.3
        });
        let values = sources.dot(&mixing.t());
        let dates: Vec<Date> = (0..rows).map(|i| day(i + 10)).collect();
        let aligned = AlignedEvents::new(
            EventTable::new(dates.clone()),
            dates.iter().map(|d| d.pred_opt().unwrap()).collect(),
            vec![0.0; rows],
            labels.clone(),
            values,
        )
        .unwrap();
        (aligned, labels)
    }

    #[rstest]
    #[case(ComponentMethod::Orthogonal, "PC")]
    #[case(ComponentMethod::IndependentSource, "IC")]
    fn score_columns_are_named(#[case] method: ComponentMethod, #[case] prefix: &str) {
        let (aligned, labels) = mixed_events(400);
        let (scored, artifact) =
            add_components(&aligned, &labels, &ComponentConfig::new(method, 3)).unwrap();

        assert_eq!(scored.len(), 400);
        assert_eq!(scored.scores().dim(), (400, 3));
        for i in 1..=3 {
            assert!(scored.score(&format!("{prefix}{i}")).is_some());
            assert!(artifact.loading(&format!("{prefix}{i}")).is_some());
        }
        assert_eq!(artifact.loadings().dim(), (3, 7));
        assert_eq!(artifact.offsets(), labels.as_slice());
        assert_eq!(artifact.method(), method);
        assert_eq!(artifact.diagnostics().method(), method);
    }

    #[rstest]
    #[case(ComponentMethod::Orthogonal)]
    #[case(ComponentMethod::IndependentSource)]
    fn pipeline_reproduces_scores(#[case] method: ComponentMethod) {
        let (aligned, labels) = mixed_events(300);
        let (scored, artifact) =
            add_components(&aligned, &labels, &ComponentConfig::new(method, 3)).unwrap();

        let replayed = artifact.transform(&aligned).unwrap();
        for (a, b) in replayed.iter().zip(scored.scores().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[rstest]
    #[case(ComponentMethod::Orthogonal)]
    #[case(ComponentMethod::IndependentSource)]
    fn identical_inputs_identical_outputs(#[case] method: ComponentMethod) {
        let (aligned, labels) = mixed_events(250);
        let config = ComponentConfig::new(method, 2);
        let (a, art_a) = add_components(&aligned, &labels, &config).unwrap();
        let (b, art_b) = add_components(&aligned, &labels, &config).unwrap();

        assert_eq!(a.scores(), b.scores());
        assert_eq!(art_a.loadings(), art_b.loadings());
    }

    #[test]
    fn pcs_of_windowed_events() {
        let (aligned, labels) = windowed_events();
        assert!(aligned.len() > 50);
        let (scored, artifact) = add_pcs(&aligned, &labels, 3).unwrap();

        assert_eq!(scored.len(), aligned.len());
        assert_eq!(scored.aligned(), &aligned);
        let ratios = artifact.diagnostics().explained_variance_ratio().unwrap();
        assert_eq!(ratios.len(), 3);
        assert!(ratios.windows(2).into_iter().all(|w| w[1] <= w[0]));
        assert!(ratios.sum() <= 1.0 + 1e-12);

        let gram = artifact.loadings().dot(&artifact.loadings().t());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(gram[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn ics_have_unit_variance() {
        let (aligned, labels) = mixed_events(500);
        let (scored, artifact) = add_ics(&aligned, &labels, 3).unwrap();

        for score in scored.scores().columns() {
            assert_relative_eq!(score.std(0.0), 1.0, epsilon = 1e-8);
        }
        assert_eq!(artifact.diagnostics().mixing().unwrap().dim(), (7, 3));
    }

    #[test]
    fn subset_of_offsets() {
        let (aligned, _) = mixed_events(200);
        let labels = OffsetLabel::range(-1, 1);
        let (_, artifact) = add_pcs(&aligned, &labels, 2).unwrap();
        assert_eq!(artifact.loadings().dim(), (2, 3));
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    fn component_count_out_of_range(#[case] k: usize) {
        let (aligned, labels) = mixed_events(50);
        let err = add_pcs(&aligned, &labels, k).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn more_components_than_events() {
        let (aligned, labels) = mixed_events(2);
        let err = add_ics(&aligned, &labels, 3).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn missing_offset_column() {
        let (aligned, _) = mixed_events(50);
        let labels = OffsetLabel::range(-3, 4);
        let err = add_pcs(&aligned, &labels, 2).unwrap_err();
        assert!(matches!(err, ComponentError::MissingColumn(ref label) if label == "4"));
    }

    #[rstest]
    #[case(ComponentMethod::Orthogonal)]
    #[case(ComponentMethod::IndependentSource)]
    fn empty_events(#[case] method: ComponentMethod) {
        let labels = OffsetLabel::range(-45, 45);
        let aligned = AlignedEvents::empty(labels.clone());
        let (scored, artifact) =
            add_components(&aligned, &labels, &ComponentConfig::new(method, 3)).unwrap();

        assert!(scored.is_empty());
        assert_eq!(scored.scores().dim(), (0, 3));
        assert_eq!(scored.names().len(), 3);
        assert_eq!(artifact.loadings().dim(), (0, 91));
        assert!(artifact.pipeline().is_none());
        assert!(artifact.loading(&format!("{}1", method.prefix())).is_none());
        assert!(matches!(
            artifact.transform(&aligned),
            Err(ComponentError::Transform(TransformError::NotFitted))
        ));
    }
}
