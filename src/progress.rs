use std::io;
use std::io::Write;
use std::time;

use isatty::stdout_isatty;


pub trait ProgressSink {
	fn begin(&mut self, n: Option<usize>);
	fn update(&mut self, inow: usize);
	fn finish(&mut self, inow: usize);
}


pub struct ProgressMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
	n: Option<usize>,
}

impl ProgressMeter {
	pub fn new() -> Self {
		let now = time::Instant::now();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
			n: None,
		}
	}
}

impl ProgressSink for ProgressMeter {
	fn begin(&mut self, n: Option<usize>) {
		let now = time::Instant::now();
		self.t0 = now;
		self.tprev = now;
		self.iprev = 0;
		self.n = n;
		match n {
			Some(_) => print!("{:6.0}% [{:6.2}/s]\r", 0.0, 0),
			None => print!("{:12} [{:6.2}/s]\r", 0, 0),
		}
		io::stdout().flush().unwrap();
	}

	fn update(&mut self, inow: usize) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = (inow - self.iprev) as f64 / dt;
		match self.n {
			Some(n) => {
				let done = (inow as f64) / (n as f64);
				print!("{:6.0}% [{:6.2}/s]\r", done * 100.0, rate);
			},
			None => {
				print!("{:12} [{:6.2}/s]\r", inow, rate);
			},
		}
		io::stdout().flush().unwrap();
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(&mut self, inow: usize) {
		let dt = (time::Instant::now() - self.t0).as_secs_f64();
		let rate = inow as f64 / dt;
		match self.n {
			Some(_) => println!("{:6.0}% [{:6.2}/s]", 100.0, rate),
			None => println!("{:12} [{:6.2}/s]", inow, rate),
		}
	}
}


// for tests and non-interactive runs
pub struct QuietMeter();

impl QuietMeter {
	pub fn new() -> Self {
		Self()
	}
}

impl ProgressSink for QuietMeter {
	fn begin(&mut self, _n: Option<usize>) {
	}

	fn update(&mut self, _inow: usize) {
	}

	fn finish(&mut self, _inow: usize) {
	}
}


pub fn default_output() -> Box<dyn ProgressSink> {
	if stdout_isatty() {
		Box::new(ProgressMeter::new())
	} else {
		Box::new(QuietMeter::new())
	}
}
