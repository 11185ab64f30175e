use web_time::Duration;

#[derive(Clone, Debug, Default)]
pub struct RenderStats {
    pub renders: u64,
    pub last_render: Option<Duration>,
    total: Duration,
}

impl RenderStats {
    pub(crate) fn record(&mut self, elapsed: Duration) {
        self.renders += 1;
        self.last_render = Some(elapsed);
        self.total += elapsed;
    }

    pub fn average(&self) -> Option<Duration> {
        let renders = u128::from(self.renders);
        if renders == 0 {
            return None;
        }
        let nanos = self.total.as_nanos() / renders;
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_survives_large_render_counts() {
        let mut stats = RenderStats::default();
        assert_eq!(stats.average(), None);

        stats.record(Duration::from_millis(4));
        stats.record(Duration::from_millis(2));
        assert_eq!(stats.average(), Some(Duration::from_millis(3)));
        assert_eq!(stats.last_render, Some(Duration::from_millis(2)));

        stats.renders = 1 << 32;
        stats.total = Duration::from_secs(1 << 32);
        assert_eq!(stats.average(), Some(Duration::from_secs(1)));
    }
}
