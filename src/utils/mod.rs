pub mod trade_no;
