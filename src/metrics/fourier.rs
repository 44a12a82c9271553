//! Discrete Fourier transforms and the bandwidth measure used by the Dorn features

use nalgebra::DMatrix;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitudes of the DFT of `signal`
pub fn dft_amplitudes(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    FftPlanner::<f64>::new().plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}

/// Magnitudes of the 2D DFT of `matrix`: rows are transformed, then columns
pub fn dft2_amplitudes(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return DMatrix::zeros(rows, cols);
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut spectrum: DMatrix<Complex<f64>> = matrix.map(|x| Complex::new(x, 0.0));

    let row_fft = planner.plan_fft_forward(cols);
    for i in 0..rows {
        let mut row: Vec<Complex<f64>> = spectrum.row(i).iter().copied().collect();
        row_fft.process(&mut row);
        spectrum.row_mut(i).copy_from_slice(&row);
    }

    let col_fft = planner.plan_fft_forward(rows);
    for j in 0..cols {
        let mut column: Vec<Complex<f64>> = spectrum.column(j).iter().copied().collect();
        col_fft.process(&mut column);
        spectrum.column_mut(j).copy_from_slice(&column);
    }

    spectrum.map(|c| c.norm())
}

/// Highest index whose value exceeds the population standard deviation, 0 if none
pub fn bandwidth(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    values
        .iter()
        .rposition(|&v| v > std)
        .map_or(0.0, |i| i as f64)
}
