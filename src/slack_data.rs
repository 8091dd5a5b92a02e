// RCT 17X6 timing summary, one entry per place-and-route run. Slack in ns.

pub const PROJECT_TITLE: &str = "RCT 17X6 PROJECT STABILITY ACROSS RUNS";

pub const RUNS: [u32; 5] = [1, 2, 3, 4, 5];

pub const WNS_NS: [f64; 5] = [-0.042, -0.035, -0.01, 0.01, -0.01];

pub const TNS_NS: [f64; 5] = [-10.568, -2.186, -0.01, 0.01, -0.01];
