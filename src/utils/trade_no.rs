use std::sync::Mutex;

use chrono::Utc;

/// 自定义纪元 2020-01-01T00:00:00Z, 毫秒。
const EPOCH_MILLIS: i64 = 1_577_836_800_000;
const WORKER_ID_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;
const WORKER_ID_SHIFT: u8 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u8 = WORKER_ID_BITS + SEQUENCE_BITS;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// 可配置的最大节点号 (含)。
pub const MAX_WORKER_ID: u16 = (1 << WORKER_ID_BITS) - 1;

/// 交易号生成器: 时间戳 | 节点号 | 毫秒内序号 的雪花式组合。
///
/// 交易号的全局唯一性依赖节点号在部署期的唯一分配, 生成过程
/// 不读写任何存储, 账本不可用时依然可用。
pub struct TradeNoGenerator {
    worker_id: u16,
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_millis: i64,
    sequence: i64,
}

impl TradeNoGenerator {
    pub fn new(worker_id: u16) -> anyhow::Result<Self> {
        if worker_id > MAX_WORKER_ID {
            anyhow::bail!("worker_id {worker_id} 超出上限 {MAX_WORKER_ID}");
        }
        Ok(Self {
            worker_id,
            state: Mutex::new(GeneratorState {
                last_millis: -1,
                sequence: 0,
            }),
        })
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    /// 生成下一个交易号。并发安全; 同进程内按生成顺序单调递增。
    pub fn next_trade_no(&self) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let mut now = current_millis();
        if now < state.last_millis {
            // 时钟回拨: 停留在已发放的最大时间戳上继续编号, 绝不回退
            now = state.last_millis;
        }

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // 毫秒内序号耗尽, 等到下一毫秒
                now = wait_next_millis(state.last_millis);
            }
        } else {
            state.sequence = 0;
        }
        state.last_millis = now;

        let id = ((now - EPOCH_MILLIS) << TIMESTAMP_SHIFT)
            | ((self.worker_id as i64) << WORKER_ID_SHIFT)
            | state.sequence;
        id.to_string()
    }
}

fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn wait_next_millis(last_millis: i64) -> i64 {
    let mut now = current_millis();
    while now <= last_millis {
        std::thread::yield_now();
        now = current_millis();
    }
    now
}
