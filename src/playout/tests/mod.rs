mod calibration;
mod scheduler;
