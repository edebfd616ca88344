//! Contract bindings for the R2 deployment.
//!
//! Each binding lives in its own module so the generated call structs
//! (`AddLiquidityCall` and friends) do not collide.

use ethers::prelude::*;

/// Signing client shared by every contract handle of one account.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

mod erc20 {
    ethers::contract::abigen!(
        Erc20,
        r#"[
            function balanceOf(address owner) external view returns (uint256)
            function allowance(address owner, address spender) external view returns (uint256)
            function approve(address spender, uint256 amount) external returns (bool)
            function decimals() external view returns (uint8)
            function symbol() external view returns (string)
        ]"#
    );
}

mod router {
    ethers::contract::abigen!(
        UniswapV2Router,
        r#"[
            function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts)
            function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)
            function addLiquidity(address tokenA, address tokenB, uint256 amountADesired, uint256 amountBDesired, uint256 amountAMin, uint256 amountBMin, address to, uint256 deadline) external returns (uint256 amountA, uint256 amountB, uint256 liquidity)
            function removeLiquidity(address tokenA, address tokenB, uint256 liquidity, uint256 amountAMin, uint256 amountBMin, address to, uint256 deadline) external returns (uint256 amountA, uint256 amountB)
        ]"#
    );
}

// Curve-style stable pool; the pool contract is also its LP token.
mod stable_pool {
    ethers::contract::abigen!(
        StableSwapPool,
        r#"[
            function add_liquidity(uint256[] _amounts, uint256 _min_mint_amount, address _receiver) external returns (uint256)
            function remove_liquidity_imbalance(uint256[] _amounts, uint256 _max_burn_amount, address _receiver) external returns (uint256)
            function calc_token_amount(uint256[] _amounts, bool _is_deposit) external view returns (uint256)
            function get_balances() external view returns (uint256[])
            function totalSupply() external view returns (uint256)
        ]"#
    );
}

pub use erc20::Erc20;
pub use router::UniswapV2Router;
pub use stable_pool::StableSwapPool;
