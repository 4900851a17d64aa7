use super::MotionFilter;
use crate::constants::DEFAULT_FPS;
use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

/// Kalman filter for smooth pointer motion
pub struct KalmanFilter {
    // State: [dx, dy, ddx, ddy]
    state: Vector4<f64>,
    // State covariance
    covariance: Matrix4<f64>,
    // Process noise
    process_noise: Matrix4<f64>,
    // Measurement noise
    measurement_noise: Matrix2<f64>,
    // State transition matrix
    transition: Matrix4<f64>,
    // Measurement matrix
    measurement: Matrix2x4<f64>,
}

impl KalmanFilter {
    #[must_use]
    pub fn new() -> Self {
        let dt: f64 = 1.0 / DEFAULT_FPS;

        #[rustfmt::skip]
        let transition = Matrix4::new(
            1.0, 0.0, dt, 0.0,
            0.0, 1.0, 0.0, dt,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        // Only the displacement itself is measured
        #[rustfmt::skip]
        let measurement = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        let q: f64 = 0.1;
        #[rustfmt::skip]
        let process_noise = Matrix4::new(
            q * dt.powi(4) / 4.0, 0.0, q * dt.powi(3) / 2.0, 0.0,
            0.0, q * dt.powi(4) / 4.0, 0.0, q * dt.powi(3) / 2.0,
            q * dt.powi(3) / 2.0, 0.0, q * dt.powi(2), 0.0,
            0.0, q * dt.powi(3) / 2.0, 0.0, q * dt.powi(2),
        );

        let measurement_noise = Matrix2::identity();

        Self {
            state: Vector4::zeros(),
            covariance: Matrix4::identity() * 1000.0,
            process_noise,
            measurement_noise,
            transition,
            measurement,
        }
    }

    fn predict(&mut self) {
        self.state = self.transition * self.state;
        self.covariance = self.transition * self.covariance * self.transition.transpose() + self.process_noise;
    }

    fn update(&mut self, measurement: Vector2<f64>) {
        let innovation = measurement - self.measurement * self.state;
        let innovation_cov =
            self.measurement * self.covariance * self.measurement.transpose() + self.measurement_noise;

        // A singular innovation covariance means the filter diverged, start over
        let Some(inverse) = innovation_cov.try_inverse() else {
            log::warn!("Kalman innovation covariance is singular, resetting filter");
            self.reset();
            self.state[0] = measurement[0];
            self.state[1] = measurement[1];
            return;
        };

        let gain = self.covariance * self.measurement.transpose() * inverse;
        self.state += gain * innovation;
        self.covariance = (Matrix4::identity() - gain * self.measurement) * self.covariance;
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionFilter for KalmanFilter {
    #[allow(clippy::cast_possible_truncation)]
    fn apply(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        self.predict();
        self.update(Vector2::new(f64::from(dx), f64::from(dy)));
        (self.state[0] as f32, self.state[1] as f32)
    }

    fn reset(&mut self) {
        self.state = Vector4::zeros();
        self.covariance = Matrix4::identity() * 1000.0;
    }

    fn name(&self) -> &str {
        "KalmanFilter"
    }
}
