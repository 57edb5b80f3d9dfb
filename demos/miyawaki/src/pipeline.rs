use std::{path::PathBuf, time::Instant};

use brain_data::{preprocess, read_volume, unmask, Dataset, DatasetLayout, EncodingData};
use enc_plot::{
    render, ColorbarFigure, Colormap, MaskRule, Origin, OverlayFigure, OverlayStyle, Plane,
    RGBColor,
};
use encoding::{cross_validate, estimate_receptive_field, KFold};
use lin_reg::{Lasso, LassoLars, TikhonovRegularization};
use nalgebra::DVector;
use ndarray::Array3;

use crate::{errors::PipelineError, params::PipelineParams};

const CONTOUR_COLOR: RGBColor = RGBColor(0, 0, 255);
const PIXEL_COLOR: RGBColor = RGBColor(255, 0, 0);
const SCORE_TICKS: [f64; 4] = [0.0, 0.2, 0.4, 0.6];
const RF_LIMITS: (f64, f64) = (0.0, 0.75);
const RF_TICKS: [f64; 3] = [0.0, 0.38, 0.75];

/// Runs the whole analysis and returns the written figures
pub(crate) fn run(params: &PipelineParams) -> Result<Vec<PathBuf>, PipelineError> {
    info!("Preprocessing data...");
    let t0 = Instant::now();
    let dataset = Dataset::discover(&params.dataset_dir, &DatasetLayout::default())?;
    let data = preprocess(&dataset, &params.preprocess)?;
    info!("Preprocessing done in {:.2}s", t0.elapsed().as_secs_f64());

    let kfold = KFold::new(data.n_samples(), params.n_folds, params.fold_seed)?;

    info!("Ridge regression");
    let t0 = Instant::now();
    let ridge = TikhonovRegularization {
        regularization_coeff: params.ridge_alpha,
        fit_intercept: true,
        normalize: true,
    };
    let ridge_scores = cross_validate(&ridge, &data.stimuli, &data.responses, &kfold)?;
    info!("ridge done in {}ms", t0.elapsed().as_millis());

    info!("Lasso regression");
    let t0 = Instant::now();
    let lasso = Lasso {
        alpha: params.lasso_alpha,
        max_iter: params.lasso_max_iter,
        tol: params.lasso_tol,
        fit_intercept: true,
        normalize: true,
    };
    let lasso_scores = cross_validate(&lasso, &data.stimuli, &data.responses, &kfold)?;
    info!("lasso done in {}ms", t0.elapsed().as_millis());

    info!("Scoring");
    let ridge_scores = ridge_scores.mean();
    let lasso_scores = lasso_scores.mean();
    info!(
        "mean score over {} voxels, ridge: {:.4}, lasso: {:.4}",
        data.n_voxels(),
        ridge_scores.mean(),
        lasso_scores.mean()
    );

    let mut written = vec![];
    let background = read_volume(&params.background)?;
    let contour = contour_plane(&background, &params.contour_voxels, params.slice)?;
    let background = axial_plane(&background, params.slice)?;
    for (name, scores) in [("ridge", &ridge_scores), ("lasso", &lasso_scores)] {
        written.extend(render_scores(params, &data, scores, &background, &contour, name)?);
    }

    let lars = LassoLars {
        max_iter: params.lars_max_iter,
        ..Default::default()
    };
    for &voxel in &params.rf_voxels {
        let rf = estimate_receptive_field(
            &lars,
            &data.stimuli,
            &data.responses,
            voxel,
            data.grid_shape,
        )?;
        let (rows, cols) = rf.grid.shape();
        let field = Plane::new(rows, cols, rf.grid.flatten().to_vec())?;
        written.extend(render_receptive_field(params, &field, &format!("encoding_{}", voxel))?);
    }

    let colorbar = ColorbarFigure {
        colormap: Colormap::BlueGreen,
        limits: RF_LIMITS,
        ticks: RF_TICKS.to_vec(),
    };
    written.extend(render(
        &colorbar,
        &params.output_dir,
        "encoding_rf_colorbar",
        params.colorbar_size,
    )?);

    info!("wrote {} figures to {:?}", written.len(), params.output_dir);
    Ok(written)
}

fn render_scores(
    params: &PipelineParams,
    data: &EncodingData,
    scores: &DVector<f64>,
    background: &Plane<f64>,
    contour: &Plane<bool>,
    name: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    let volume = unmask(scores, &data.mask)?;
    let overlay = axial_plane(&volume, params.slice)?;
    let style = OverlayStyle {
        background_colormap: Colormap::Gray,
        background_limits: None,
        overlay_colormap: Colormap::Hot,
        overlay_limits: None,
        mask_rule: MaskRule::BelowThreshold(params.score_threshold),
        origin: Origin::Lower,
        contour_color: CONTOUR_COLOR,
        contour_width: 3,
        colorbar_ticks: Some(SCORE_TICKS.to_vec()),
    };
    let figure = OverlayFigure::new(background, &overlay, contour, &style)?;

    Ok(render(
        &figure,
        &params.output_dir,
        &format!("encoding_scores_{}", name),
        params.figure_size,
    )?)
}

fn render_receptive_field(
    params: &PipelineParams,
    field: &Plane<f64>,
    name: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    let (rows, cols) = field.shape();
    let (pr, pc) = params.rf_pixel;
    if pr >= rows || pc >= cols {
        return Err(PipelineError::OutOfBounds {
            what: "stimulus pixel",
            index: vec![pr, pc],
            shape: vec![rows, cols],
        });
    }

    let black = Plane::filled(rows, cols, 0.0);
    let pixel = Plane::from_fn(rows, cols, |r, c| (r, c) == params.rf_pixel);
    let style = OverlayStyle {
        background_colormap: Colormap::Gray,
        background_limits: Some((0.0, 1.0)),
        overlay_colormap: Colormap::BlueGreen,
        overlay_limits: Some(RF_LIMITS),
        mask_rule: MaskRule::EqualTo(0.0),
        origin: Origin::Upper,
        contour_color: PIXEL_COLOR,
        contour_width: 6,
        colorbar_ticks: None,
    };
    let figure = OverlayFigure::new(&black, field, &pixel, &style)?;

    Ok(render(&figure, &params.output_dir, name, params.figure_size)?)
}

/// Axial slice `z` of `volume`, one row per `y` and one column per `x`
fn axial_plane<T: Copy>(volume: &Array3<T>, z: usize) -> Result<Plane<T>, PipelineError> {
    let (nx, ny, nz) = volume.dim();
    if z >= nz {
        return Err(PipelineError::OutOfBounds {
            what: "slice",
            index: vec![z],
            shape: vec![nx, ny, nz],
        });
    }

    Ok(Plane::from_fn(ny, nx, |y, x| volume[[x, y, z]]))
}

/// Marks the `(x, y, z)` voxels lying on axial slice `z` of `volume`
fn contour_plane(
    volume: &Array3<f64>,
    voxels: &[(usize, usize, usize)],
    z: usize,
) -> Result<Plane<bool>, PipelineError> {
    let (nx, ny, nz) = volume.dim();
    if let Some((x, y, vz)) = voxels
        .iter()
        .find(|(x, y, vz)| *x >= nx || *y >= ny || *vz >= nz)
    {
        return Err(PipelineError::OutOfBounds {
            what: "contour voxel",
            index: vec![*x, *y, *vz],
            shape: vec![nx, ny, nz],
        });
    }

    Ok(Plane::from_fn(ny, nx, |y, x| voxels.contains(&(x, y, z))))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use brain_data::PreprocessParams;
    use ndarray::{Array, Array4, Dimension, RemoveAxis};
    use nifti::writer::WriterOptions;
    use tempfile::tempdir;

    use super::*;

    const DIMS: (usize, usize, usize) = (4, 3, 2);
    const N_SCANS: usize = 30;

    fn write_image<D: Dimension + RemoveAxis>(path: &Path, data: &Array<f64, D>) {
        WriterOptions::new(path).write_nifti(data).unwrap();
    }

    /// Pixel `p` of the stimulus shown at scan `t` of `run`
    fn pixel_on(run: usize, t: usize, p: usize) -> f64 {
        (((t + 3 * run) >> p) & 1) as f64
    }

    /// A gzipped dataset whose voxels respond linearly to the stimuli two scans earlier
    fn write_dataset(root: &Path) {
        let (nx, ny, nz) = DIMS;
        fs::create_dir_all(root.join("func")).unwrap();
        fs::create_dir_all(root.join("label")).unwrap();
        write_image(&root.join("mask.nii.gz"), &Array3::<f64>::ones(DIMS));
        write_image(
            &root.join("bg.nii.gz"),
            &Array3::from_shape_fn(DIMS, |(x, y, z)| (x + y + z) as f64),
        );

        for run in 0..2 {
            let series = Array4::from_shape_fn((nx, ny, nz, N_SCANS), |(x, y, z, t)| {
                let voxel = (x * ny + y) * nz + z;
                let drive: f64 = match t.checked_sub(2) {
                    Some(shown) => (0..4)
                        .map(|p| ((voxel + p) % 3) as f64 * pixel_on(run, shown, p))
                        .sum(),
                    None => 0.0,
                };
                drive + 0.05 * ((t * t + voxel) % 7) as f64
            });
            write_image(
                &root.join(format!("func/data_random_run0{}.nii.gz", run + 1)),
                &series,
            );

            let labels: String = (0..N_SCANS)
                .map(|t| {
                    let row: Vec<String> = (0..4)
                        .map(|p| (pixel_on(run, t, p) as i64).to_string())
                        .collect();
                    row.join(",") + "\n"
                })
                .collect();
            fs::write(
                root.join(format!("label/label_random_run0{}.csv", run + 1)),
                labels,
            )
            .unwrap();
        }
    }

    #[test]
    fn run_writes_every_figure() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let dir = tempdir().unwrap();
        let root = dir.path();
        write_dataset(root);
        let params = PipelineParams {
            dataset_dir: root.to_path_buf(),
            background: root.join("bg.nii.gz"),
            output_dir: root.join("output"),
            preprocess: PreprocessParams {
                grid_shape: (2, 2),
                ..Default::default()
            },
            rf_voxels: vec![0, 5],
            contour_voxels: vec![(1, 1, 1), (2, 1, 1)],
            slice: 1,
            rf_pixel: (1, 0),
            figure_size: (80, 80),
            colorbar_size: (120, 30),
            ..Default::default()
        };

        let written = run(&params).unwrap();

        let mut names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let mut expected = vec![];
        for stem in [
            "encoding_0",
            "encoding_5",
            "encoding_rf_colorbar",
            "encoding_scores_lasso",
            "encoding_scores_ridge",
        ] {
            for ext in ["eps", "png", "svg"] {
                expected.push(format!("{}.{}", stem, ext));
            }
        }
        assert_eq!(names, expected);
        for path in &written {
            assert_eq!(path.parent().unwrap(), params.output_dir);
            assert!(fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn stimulus_pixel_outside_the_grid_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_dataset(root);
        let params = PipelineParams {
            dataset_dir: root.to_path_buf(),
            background: root.join("bg.nii.gz"),
            output_dir: root.join("output"),
            preprocess: PreprocessParams {
                grid_shape: (2, 2),
                ..Default::default()
            },
            rf_voxels: vec![0],
            contour_voxels: vec![],
            slice: 1,
            rf_pixel: (4, 2),
            figure_size: (40, 40),
            ..Default::default()
        };

        assert!(matches!(
            run(&params),
            Err(PipelineError::OutOfBounds {
                what: "stimulus pixel",
                ..
            })
        ));
    }

    #[test]
    fn axial_plane_is_transposed() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let volume = Array3::from_shape_fn((3, 2, 4), |(x, y, z)| (x * 100 + y * 10 + z) as f64);

        let plane = axial_plane(&volume, 2).unwrap();
        assert_eq!(plane.shape(), (2, 3));
        assert_eq!(plane.get(1, 2), 212.0);
        assert_eq!(plane.get(0, 1), 102.0);
        assert!(matches!(
            axial_plane(&volume, 4),
            Err(PipelineError::OutOfBounds { what: "slice", .. })
        ));
    }

    #[test]
    fn contour_marks_selected_voxels() {
        let volume = Array3::zeros((4, 3, 2));

        let voxels = [(3, 0, 1), (1, 2, 1), (2, 2, 0)];

        let plane = contour_plane(&volume, &voxels, 1).unwrap();
        assert_eq!(plane.shape(), (3, 4));
        assert_eq!(plane.values().iter().filter(|v| **v).count(), 2);
        assert!(plane.get(0, 3));
        assert!(plane.get(2, 1));
        // the voxel on slice 0 only shows up there
        assert!(!plane.get(2, 2));
        let plane = contour_plane(&volume, &voxels, 0).unwrap();
        assert_eq!(plane.values().iter().filter(|v| **v).count(), 1);
        assert!(plane.get(2, 2));

        assert!(matches!(
            contour_plane(&volume, &[(4, 0, 0)], 0),
            Err(PipelineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            contour_plane(&volume, &[(0, 0, 2)], 0),
            Err(PipelineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn defaults_follow_the_published_analysis() {
        let params = PipelineParams::default();

        assert_eq!(params.n_folds, 10);
        assert_eq!(params.ridge_alpha, 100.0);
        assert_eq!(params.preprocess.grid_shape, (10, 10));
        assert_eq!(params.rf_voxels, vec![1700, 1800, 1900, 2000]);
    }
}
